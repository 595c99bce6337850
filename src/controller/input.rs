/// Platform-agnostic input handling system
use std::collections::HashSet;

/// Platform-independent input events
#[derive(Debug, Clone)]
pub enum InputEvent {
    // Keyboard events
    KeyDown { key: String, repeat: bool },
    KeyUp(String),

    // Mouse events
    /// raw device motion, only meaningful while the pointer is locked
    MouseMotion { dx: f32, dy: f32 },
    CursorMoved { x: f32, y: f32 },
    MouseButton { button: MouseButton, is_down: bool },

    // Window events
    FocusLost,
    PointerLockChanged { locked: bool },
    Resized { width: u32, height: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Movement intents held this tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveIntents {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
}

impl MoveIntents {
    pub fn any(&self) -> bool {
        self.forward || self.backward || self.left || self.right
    }
}

/// Everything one tick needs from the input layer, sampled once at the top of the tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputSnapshot {
    pub moves: MoveIntents,
    /// jump was pressed since the last tick
    pub jump: bool,
    /// pointer-locked mouse motion since the last tick, in pixels
    pub look_delta: (f32, f32),
    /// left-button drag motion since the last tick while the pointer was free
    pub drag_delta: (f32, f32),
    /// a placement click arrived since the last tick
    pub place: bool,
}

/// Key mapping configuration
#[derive(Clone, Debug)]
pub struct KeyBindings {
    pub forward: Vec<String>,
    pub backward: Vec<String>,
    pub left: Vec<String>,
    pub right: Vec<String>,
    pub jump: Vec<String>,
    pub release_pointer: String,
}

impl Default for KeyBindings {
    fn default() -> Self {
        let keys = |ks: &[&str]| ks.iter().map(|k| k.to_string()).collect::<Vec<_>>();
        Self {
            forward: keys(&["KeyW", "ArrowUp"]),
            backward: keys(&["KeyS", "ArrowDown"]),
            left: keys(&["KeyA", "ArrowLeft"]),
            right: keys(&["KeyD", "ArrowRight"]),
            jump: keys(&["Space"]),
            release_pointer: "Escape".to_string(),
        }
    }
}

/// Accumulates events between ticks
pub struct InputState {
    pub bindings: KeyBindings,
    pub pressed_keys: HashSet<String>,
    pub pointer_locked: bool,
    pub left_held: bool,
    pub look_delta: (f32, f32),
    pub drag_delta: (f32, f32),
    pub last_cursor: Option<(f32, f32)>,
    pub jump_requested: bool,
    pub place_requested: bool,
    pub viewport: Option<(u32, u32)>,
}

impl Default for InputState {
    fn default() -> Self {
        Self::new(KeyBindings::default())
    }
}

impl InputState {
    pub fn new(bindings: KeyBindings) -> Self {
        Self {
            bindings,
            pressed_keys: HashSet::new(),
            pointer_locked: false,
            left_held: false,
            look_delta: (0.0, 0.0),
            drag_delta: (0.0, 0.0),
            last_cursor: None,
            jump_requested: false,
            place_requested: false,
            viewport: None,
        }
    }

    /// Process an input event and update state
    pub fn process_event(&mut self, event: &InputEvent) {
        match event {
            InputEvent::KeyDown { key, repeat } => {
                if !repeat && self.is_bound(&self.bindings.jump, key) {
                    self.jump_requested = true;
                }
                self.pressed_keys.insert(key.clone());
            }
            InputEvent::KeyUp(key) => {
                self.pressed_keys.remove(key.as_str());
            }
            InputEvent::MouseMotion { dx, dy } => {
                if self.pointer_locked {
                    self.look_delta.0 += dx;
                    self.look_delta.1 += dy;
                }
            }
            InputEvent::CursorMoved { x, y } => {
                if !self.pointer_locked && self.left_held {
                    if let Some((lx, ly)) = self.last_cursor {
                        self.drag_delta.0 += x - lx;
                        self.drag_delta.1 += y - ly;
                    }
                }
                self.last_cursor = Some((*x, *y));
            }
            InputEvent::MouseButton { button, is_down } => {
                if *button == MouseButton::Left {
                    self.left_held = *is_down;
                    // only a locked pointer aims; a free click just grabs the pointer
                    if *is_down && self.pointer_locked {
                        self.place_requested = true;
                    }
                }
            }
            InputEvent::FocusLost => {
                self.clear_keys();
            }
            InputEvent::PointerLockChanged { locked } => {
                self.pointer_locked = *locked;
                self.look_delta = (0.0, 0.0);
            }
            InputEvent::Resized { width, height } => {
                self.viewport = Some((*width, *height));
            }
        }
    }

    fn is_bound(&self, keys: &[String], key: &str) -> bool {
        keys.iter().any(|k| k == key)
    }

    fn any_pressed(&self, keys: &[String]) -> bool {
        keys.iter().any(|k| self.pressed_keys.contains(k))
    }

    pub fn is_release_pointer(&self, key: &str) -> bool {
        key == self.bindings.release_pointer
    }

    pub fn clear_keys(&mut self) {
        self.pressed_keys.clear();
        self.left_held = false;
    }

    /// Freeze the current state into a snapshot and reset the per-tick accumulators
    pub fn take_snapshot(&mut self) -> InputSnapshot {
        let snapshot = InputSnapshot {
            moves: MoveIntents {
                forward: self.any_pressed(&self.bindings.forward),
                backward: self.any_pressed(&self.bindings.backward),
                left: self.any_pressed(&self.bindings.left),
                right: self.any_pressed(&self.bindings.right),
            },
            jump: self.jump_requested,
            look_delta: self.look_delta,
            drag_delta: self.drag_delta,
            place: self.place_requested,
        };
        self.jump_requested = false;
        self.place_requested = false;
        self.look_delta = (0.0, 0.0);
        self.drag_delta = (0.0, 0.0);
        snapshot
    }

    /// Pending viewport size, if a resize arrived since the last call
    pub fn take_resize(&mut self) -> Option<(u32, u32)> {
        self.viewport.take()
    }
}
