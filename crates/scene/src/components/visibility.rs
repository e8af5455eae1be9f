/// Whether the host draws and picks an entity. Entities start visible.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Visibility {
    pub visible: bool,
}

impl Visibility {
    pub fn from_flag(visible: bool) -> Self {
        Self { visible }
    }

    pub fn hidden() -> Self {
        Self::from_flag(false)
    }
}

impl Default for Visibility {
    fn default() -> Self {
        Self::from_flag(true)
    }
}

#[cfg(test)]
mod tests {
    use super::Visibility;

    #[test]
    fn default_is_visible() {
        assert!(Visibility::default().visible);
        assert!(!Visibility::hidden().visible);
    }
}
