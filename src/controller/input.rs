//! Platform-agnostic input handling

/// Platform-independent input events, queued by the platform layer and
/// drained by the frame loop at tick start
#[derive(Debug, Clone)]
pub enum InputEvent {
    KeyDown(String),
    KeyUp(String),

    /// Raw pointer delta. Only enqueued while look control is captured.
    MouseMove { dx: f32, dy: f32 },

    // Window events
    FocusLost,
    VisibilityChanged { visible: bool },
    PointerLockChanged { locked: bool },
}

/// What a key press means for navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Forward,
    Backward,
    Left,
    Right,
    Ascend,
    Descend,
    Run,
}

/// Current directional intent. Mutated only by key events; the integrator
/// reads it without consuming anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct InputState {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub ascend: bool,
    pub descend: bool,
    pub running: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, intent: Intent, active: bool) {
        match intent {
            Intent::Forward => self.forward = active,
            Intent::Backward => self.backward = active,
            Intent::Left => self.left = active,
            Intent::Right => self.right = active,
            Intent::Ascend => self.ascend = active,
            Intent::Descend => self.descend = active,
            Intent::Run => self.running = active,
        }
    }

    /// Drop every held intent, used when the window loses focus so keys
    /// released while unfocused cannot stick
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Key mapping configuration
#[derive(Clone)]
pub struct KeyBindings {
    pub forward: String,
    pub backward: String,
    pub left: String,
    pub right: String,
    pub ascend: String,
    pub descend: String,
    pub run: String,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            forward: "w".to_string(),
            backward: "s".to_string(),
            left: "a".to_string(),
            right: "d".to_string(),
            ascend: " ".to_string(),
            descend: "c".to_string(),
            run: "Shift".to_string(),
        }
    }
}

impl KeyBindings {
    /// Resolve a logical key to its navigation intent. Arrow keys are fixed
    /// aliases for the walk directions.
    pub fn intent_of(&self, key: &str) -> Option<Intent> {
        if key.eq_ignore_ascii_case(&self.forward) || key == "ArrowUp" {
            Some(Intent::Forward)
        } else if key.eq_ignore_ascii_case(&self.backward) || key == "ArrowDown" {
            Some(Intent::Backward)
        } else if key.eq_ignore_ascii_case(&self.left) || key == "ArrowLeft" {
            Some(Intent::Left)
        } else if key.eq_ignore_ascii_case(&self.right) || key == "ArrowRight" {
            Some(Intent::Right)
        } else if key == self.ascend {
            Some(Intent::Ascend)
        } else if key.eq_ignore_ascii_case(&self.descend) {
            Some(Intent::Descend)
        } else if key == self.run {
            Some(Intent::Run)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_events_toggle_intents() {
        let mut input = InputState::new();
        input.set(Intent::Forward, true);
        input.set(Intent::Run, true);
        assert!(input.forward && input.running);
        input.set(Intent::Forward, false);
        assert!(!input.forward);
        assert!(input.running, "releasing one key must not touch the others");
    }

    #[test]
    fn bindings_cover_wasd_and_arrows() {
        let bindings = KeyBindings::default();
        assert_eq!(bindings.intent_of("w"), Some(Intent::Forward));
        assert_eq!(bindings.intent_of("W"), Some(Intent::Forward));
        assert_eq!(bindings.intent_of("ArrowUp"), Some(Intent::Forward));
        assert_eq!(bindings.intent_of("ArrowLeft"), Some(Intent::Left));
        assert_eq!(bindings.intent_of(" "), Some(Intent::Ascend));
        assert_eq!(bindings.intent_of("c"), Some(Intent::Descend));
        assert_eq!(bindings.intent_of("Shift"), Some(Intent::Run));
        assert_eq!(bindings.intent_of("x"), None);
    }

    #[test]
    fn clear_resets_everything() {
        let mut input = InputState::new();
        input.set(Intent::Backward, true);
        input.set(Intent::Ascend, true);
        input.clear();
        assert!(!input.backward && !input.ascend);
    }
}
