/*!
An observer registry for single-threaded subjects

# Design requirements:
- Observers are registered by weak reference. The registry never decides when an observer dies.
- Observers must be able to add and remove observers (including themselves) from inside a
  notification callback without corrupting the round in progress.
- Each round delivers to every observer that was registered when the round started and is still
  registered when its turn comes, in insertion order, exactly once.
- Generic over the capability: the registry holds `Weak<O>` for any `O: ?Sized`, usually a `dyn Trait`
  owned by the subject.

# Delivery modes
- `notify` - snapshots weak references and upgrades each one only at its turn, after checking it is
  still registered. The upgraded handle is released when the callback returns.
- `notify_safe` - the same delivery, named for teardown notifications where observers deregister
  or drop.
- `try_notify` / `try_notify_safe` - fallible callbacks. The first error ends the round and is
  returned as is.

# Basic usage

```rust
use observatory::Observatory;
use std::cell::Cell;
use std::rc::{Rc, Weak};

trait Listener {
    fn ping(&self);
}

struct Counter(Cell<u32>);
impl Listener for Counter {
    fn ping(&self) { self.0.set(self.0.get() + 1) }
}

let registry: Observatory<dyn Listener> = Observatory::new();
let counter = Rc::new(Counter(Cell::new(0)));
registry.add_observer(Rc::downgrade(&counter) as Weak<dyn Listener>).unwrap();

registry.notify(|listener| listener.ping());
assert_eq!(counter.0.get(), 1);

// removal is by address, so an observer can pass `self`
assert!(registry.remove_observer(&*counter));
registry.notify(|listener| listener.ping());
assert_eq!(counter.0.get(), 1);
```

# Two-phase teardown

```rust
use observatory::{Lifecycle, Observatory};
use std::rc::{Rc, Weak};

trait Listener {
    fn closing(&self, registry: &Observatory<dyn Listener>);
}

struct Leaver;
impl Listener for Leaver {
    fn closing(&self, registry: &Observatory<dyn Listener>) { registry.remove_observer(self); }
}

let registry: Observatory<dyn Listener> = Observatory::new();
let leaver = Rc::new(Leaver);
registry.add_observer(Rc::downgrade(&leaver) as Weak<dyn Listener>).unwrap();

registry.begin_teardown(|listener| listener.closing(&registry));
assert!(registry.is_empty());

// nobody is left to hear about it
registry.finish_teardown(|_| unreachable!());
assert_eq!(registry.lifecycle(), Lifecycle::Destroyed);
```
*/

mod error;
mod lifecycle;
mod registry;

pub use error::*;
pub use lifecycle::*;
pub use registry::*;
