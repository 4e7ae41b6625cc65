use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::str::FromStr;

use observatory::Observatory;
use tracing::Level;

// Initialize tracing for tests
#[ctor::ctor]
fn init_tracing() {
    // if LOG_LEVEL env var is set, use it
    let level = std::env::var("LOG_LEVEL").ok().and_then(|level| Level::from_str(&level).ok()).unwrap_or(Level::INFO);
    let _ = tracing_subscriber::fmt().with_max_level(level).with_test_writer().try_init();
}

/// The capability the test subjects broadcast against
#[allow(unused)]
pub trait Listener {
    fn name(&self) -> &'static str;
    fn heard(&self, round: &'static str);
}

pub type Registry = Rc<Observatory<dyn Listener>>;
pub type Journal = Rc<RefCell<Vec<String>>>;

/// Records every callback into a shared journal, then runs its reaction (if any)
pub struct Recorder {
    name: &'static str,
    journal: Journal,
    reaction: RefCell<Option<Box<dyn Fn(&Recorder)>>>,
}

impl Recorder {
    pub fn new(name: &'static str, journal: &Journal) -> Rc<Self> {
        Rc::new(Self { name, journal: journal.clone(), reaction: RefCell::new(None) })
    }

    pub fn react(&self, reaction: impl Fn(&Recorder) + 'static) { *self.reaction.borrow_mut() = Some(Box::new(reaction)); }
}

impl Listener for Recorder {
    fn name(&self) -> &'static str { self.name }

    fn heard(&self, round: &'static str) {
        self.journal.borrow_mut().push(format!("{}:{}", self.name, round));
        if let Some(reaction) = self.reaction.borrow().as_ref() {
            reaction(self);
        }
    }
}

#[allow(unused)]
pub fn registry() -> Registry { Rc::new(Observatory::new()) }

#[allow(unused)]
pub fn journal() -> Journal { Rc::new(RefCell::new(Vec::new())) }

/// Drains the journal
#[allow(unused)]
pub fn take(journal: &Journal) -> Vec<String> { journal.borrow_mut().drain(..).collect() }

#[allow(unused)]
pub fn attach(registry: &Registry, recorders: &[&Rc<Recorder>]) {
    for recorder in recorders {
        registry.add_observer(Rc::downgrade(*recorder) as Weak<dyn Listener>).unwrap();
    }
}

/// A reaction that removes `target` from `registry`
#[allow(unused)]
pub fn removes(registry: &Registry, target: &Rc<Recorder>) -> impl Fn(&Recorder) + 'static {
    let registry = Rc::downgrade(registry);
    let target: Weak<Recorder> = Rc::downgrade(target);
    move |_| {
        if let (Some(registry), Some(target)) = (registry.upgrade(), target.upgrade()) {
            registry.remove_observer(&*target);
        }
    }
}

/// A reaction that removes the recorder running it
#[allow(unused)]
pub fn removes_self(registry: &Registry) -> impl Fn(&Recorder) + 'static {
    let registry = Rc::downgrade(registry);
    move |me| {
        if let Some(registry) = registry.upgrade() {
            registry.remove_observer(me);
        }
    }
}
