//! Subsystems that hold block references across frames.
//!
//! Frame callbacks and similar holders keep [`BlockRef`](crate::BlockRef)s
//! and read blocks asynchronously to the main loop. They are suspended for
//! the whole of a relocation and told the new base location on resume.

use indexmap::IndexMap;
use log::debug;

use crate::arena::BaseLocation;

/// A holder of block references that must not run mid-relocation.
pub trait BlockConsumer {
    /// Stop touching save blocks.
    fn suspend(&mut self);

    /// Refresh held references against `location` and start again.
    fn resume(&mut self, location: BaseLocation);
}

/// Named set of [`BlockConsumer`]s, suspended and resumed in
/// registration order.
#[derive(Default)]
pub struct ConsumerRegistry {
    consumers: IndexMap<String, Box<dyn BlockConsumer>>,
}

impl ConsumerRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a consumer. A consumer with the same name is replaced
    /// and returned.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        consumer: Box<dyn BlockConsumer>,
    ) -> Option<Box<dyn BlockConsumer>> {
        self.consumers.insert(name.into(), consumer)
    }

    /// Remove a consumer by name.
    pub fn unregister(&mut self, name: &str) -> Option<Box<dyn BlockConsumer>> {
        self.consumers.shift_remove(name)
    }

    /// Number of registered consumers.
    pub fn len(&self) -> usize {
        self.consumers.len()
    }

    /// Whether no consumers are registered.
    pub fn is_empty(&self) -> bool {
        self.consumers.is_empty()
    }

    /// Registered names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.consumers.keys().map(String::as_str)
    }

    /// Suspend everything until the returned guard drops.
    pub fn suspend(&mut self, current: BaseLocation) -> SuspendGuard<'_> {
        for (name, c) in &mut self.consumers {
            debug!("suspending block consumer '{name}'");
            c.suspend();
        }
        SuspendGuard {
            registry: self,
            location: current,
        }
    }
}

/// Keeps every consumer suspended while alive.
///
/// Dropping the guard resumes consumers at the location last passed to
/// [`relocated`](SuspendGuard::relocated), or at the original location if
/// the relocation bailed out.
pub struct SuspendGuard<'a> {
    registry: &'a mut ConsumerRegistry,
    location: BaseLocation,
}

impl SuspendGuard<'_> {
    /// Record the location consumers should resume at.
    pub fn relocated(&mut self, location: BaseLocation) {
        self.location = location;
    }
}

impl Drop for SuspendGuard<'_> {
    fn drop(&mut self) {
        for (name, c) in &mut self.registry.consumers {
            debug!(
                "resuming block consumer '{name}' at {:#x} (gen {})",
                self.location.offset, self.location.generation
            );
            c.resume(self.location);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use tandem_core::Generation;

    struct Recorder {
        name: &'static str,
        log: Rc<RefCell<Vec<String>>>,
    }

    impl BlockConsumer for Recorder {
        fn suspend(&mut self) {
            self.log.borrow_mut().push(format!("suspend {}", self.name));
        }
        fn resume(&mut self, location: BaseLocation) {
            self.log
                .borrow_mut()
                .push(format!("resume {} {}", self.name, location.offset));
        }
    }

    fn registry(log: &Rc<RefCell<Vec<String>>>) -> ConsumerRegistry {
        let mut reg = ConsumerRegistry::new();
        for name in ["vblank", "hblank"] {
            reg.register(
                name,
                Box::new(Recorder {
                    name,
                    log: Rc::clone(log),
                }),
            );
        }
        reg
    }

    fn at(offset: usize) -> BaseLocation {
        BaseLocation {
            generation: Generation(0),
            offset,
        }
    }

    #[test]
    fn guard_resumes_at_new_location() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut reg = registry(&log);
        {
            let mut guard = reg.suspend(at(0));
            guard.relocated(at(40));
        }
        assert_eq!(
            *log.borrow(),
            vec![
                "suspend vblank",
                "suspend hblank",
                "resume vblank 40",
                "resume hblank 40"
            ]
        );
    }

    #[test]
    fn abandoned_guard_resumes_at_old_location() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut reg = registry(&log);
        drop(reg.suspend(at(12)));
        assert!(log.borrow().iter().any(|l| l == "resume hblank 12"));
    }

    #[test]
    fn register_replaces_by_name() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut reg = registry(&log);
        let old = reg.register(
            "vblank",
            Box::new(Recorder {
                name: "vblank2",
                log: Rc::clone(&log),
            }),
        );
        assert!(old.is_some());
        assert_eq!(reg.len(), 2);
        assert!(reg.unregister("hblank").is_some());
        assert_eq!(reg.names().collect::<Vec<_>>(), vec!["vblank"]);
    }
}
