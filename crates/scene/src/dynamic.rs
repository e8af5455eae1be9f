use std::rc::Rc;

/// A value the host pulls every frame.
///
/// `Static` is a snapshot captured once. `Live` is recomputed from whatever
/// state the supplier closes over each time it is sampled, so a preview bound
/// to a drawing session follows the session without any push notification.
pub enum Dynamic<T> {
    Static(T),
    Live(Rc<dyn Fn() -> T>),
}

impl<T: Clone> Dynamic<T> {
    pub fn live(supplier: impl Fn() -> T + 'static) -> Self {
        Dynamic::Live(Rc::new(supplier))
    }

    /// Current value: the snapshot itself, or a fresh evaluation of the supplier.
    pub fn sample(&self) -> T {
        match self {
            Dynamic::Static(value) => value.clone(),
            Dynamic::Live(supplier) => supplier(),
        }
    }

    pub fn is_live(&self) -> bool {
        matches!(self, Dynamic::Live(_))
    }

    /// Replace a live binding with a snapshot of its current value.
    pub fn freeze(&self) -> Self {
        Dynamic::Static(self.sample())
    }
}

impl<T: Clone> Clone for Dynamic<T> {
    fn clone(&self) -> Self {
        match self {
            Dynamic::Static(value) => Dynamic::Static(value.clone()),
            Dynamic::Live(supplier) => Dynamic::Live(Rc::clone(supplier)),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Dynamic<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Dynamic::Static(value) => f.debug_tuple("Static").field(value).finish(),
            Dynamic::Live(_) => f.write_str("Live(..)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Dynamic;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn live_binding_tracks_source() {
        let source = Rc::new(RefCell::new(vec![1, 2]));
        let bound = {
            let source = Rc::clone(&source);
            Dynamic::live(move || source.borrow().clone())
        };
        assert_eq!(bound.sample(), vec![1, 2]);
        source.borrow_mut().push(3);
        assert_eq!(bound.sample(), vec![1, 2, 3]);
    }

    #[test]
    fn freeze_detaches_from_source() {
        let source = Rc::new(RefCell::new(1));
        let bound = {
            let source = Rc::clone(&source);
            Dynamic::live(move || *source.borrow())
        };
        let frozen = bound.freeze();
        *source.borrow_mut() = 5;
        assert!(!frozen.is_live());
        assert_eq!(frozen.sample(), 1);
        assert_eq!(bound.sample(), 5);
    }
}
