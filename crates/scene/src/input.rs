use foundation::math::Vec2;

/// Pointer event kinds the capture engine listens to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum InputKind {
    PrimaryClick,
    SecondaryClick,
    PointerMove,
}

impl InputKind {
    pub const ALL: [InputKind; 3] = [
        InputKind::PrimaryClick,
        InputKind::SecondaryClick,
        InputKind::PointerMove,
    ];

    fn slot(self) -> usize {
        match self {
            InputKind::PrimaryClick => 0,
            InputKind::SecondaryClick => 1,
            InputKind::PointerMove => 2,
        }
    }
}

/// A pointer event in screen pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PointerEvent {
    pub kind: InputKind,
    pub position: Vec2,
}

impl PointerEvent {
    pub fn primary(x: f64, y: f64) -> Self {
        Self {
            kind: InputKind::PrimaryClick,
            position: Vec2::new(x, y),
        }
    }

    pub fn secondary(x: f64, y: f64) -> Self {
        Self {
            kind: InputKind::SecondaryClick,
            position: Vec2::new(x, y),
        }
    }

    pub fn moved(x: f64, y: f64) -> Self {
        Self {
            kind: InputKind::PointerMove,
            position: Vec2::new(x, y),
        }
    }
}

/// Token identifying whoever installed a binding.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct InputOwner(pub u32);

/// Single input dispatch channel: at most one owner per event kind.
///
/// Binding a kind that is already bound replaces the previous owner; handlers
/// never stack.
#[derive(Debug, Default)]
pub struct InputChannel {
    next_owner: u32,
    bindings: [Option<InputOwner>; 3],
}

impl InputChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate_owner(&mut self) -> InputOwner {
        let owner = InputOwner(self.next_owner);
        self.next_owner += 1;
        owner
    }

    /// Returns the owner that was displaced, if any.
    pub fn bind(&mut self, kind: InputKind, owner: InputOwner) -> Option<InputOwner> {
        let displaced = self.bindings[kind.slot()].replace(owner);
        if let Some(prev) = displaced
            && prev != owner
        {
            tracing::trace!(?kind, from = prev.0, to = owner.0, "input binding replaced");
        }
        displaced
    }

    pub fn unbind(&mut self, kind: InputKind) -> Option<InputOwner> {
        self.bindings[kind.slot()].take()
    }

    pub fn owner(&self, kind: InputKind) -> Option<InputOwner> {
        self.bindings[kind.slot()]
    }
}

/// Pointer affordance shown over the map.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum CursorStyle {
    #[default]
    Pointer,
    Default,
    Crosshair,
}

#[cfg(test)]
mod tests {
    use super::{InputChannel, InputKind};

    #[test]
    fn rebinding_replaces_instead_of_stacking() {
        let mut ch = InputChannel::new();
        let a = ch.allocate_owner();
        let b = ch.allocate_owner();
        assert_ne!(a, b);

        assert_eq!(ch.bind(InputKind::PrimaryClick, a), None);
        assert_eq!(ch.bind(InputKind::PrimaryClick, b), Some(a));
        assert_eq!(ch.owner(InputKind::PrimaryClick), Some(b));

        assert_eq!(ch.unbind(InputKind::PrimaryClick), Some(b));
        assert_eq!(ch.owner(InputKind::PrimaryClick), None);
        assert_eq!(ch.owner(InputKind::PointerMove), None);
    }
}
