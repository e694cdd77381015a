//! Logical input bindings per input context
//!
//! A binding maps a symbolic action name to one keyboard key and one gamepad
//! control. Gamepad indices follow the standard layout (0 South, 1 East,
//! 2 West, 3 North, 4/5 bumpers, 8 Select, 9 Start, 12-15 D-pad).

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use super::events::KeyCode;
use super::state::GamepadState;

/// Named action names every context binds for movement
pub const MOVEMENT_ACTIONS: [&str; 4] = ["up", "down", "left", "right"];

/// Which binding table is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputContextKind {
    World,
    Battle,
    Map,
}

impl InputContextKind {
    pub const ALL: [InputContextKind; 3] = [Self::World, Self::Battle, Self::Map];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::World => "world",
            Self::Battle => "battle",
            Self::Map => "map",
        }
    }
}

impl fmt::Display for InputContextKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a context name matches no binding table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownContext(pub String);

impl FromStr for InputContextKind {
    type Err = UnknownContext;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "world" => Ok(Self::World),
            "battle" => Ok(Self::Battle),
            "map" => Ok(Self::Map),
            other => Err(UnknownContext(other.to_string())),
        }
    }
}

/// Stick axis an action can be bound to (left stick)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StickAxis {
    X,
    Y,
}

impl StickAxis {
    pub fn index(self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
        }
    }
}

/// Deflection direction along a stick axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisDirection {
    Negative,
    Positive,
}

impl AxisDirection {
    fn sign(self) -> f32 {
        match self {
            Self::Negative => -1.0,
            Self::Positive => 1.0,
        }
    }
}

/// Gamepad side of a binding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamepadControl {
    Button(usize),
    Axis {
        axis: StickAxis,
        direction: AxisDirection,
    },
}

impl GamepadControl {
    /// Whether this control is active in the given snapshot
    pub fn is_active(self, pad: &GamepadState, axis_threshold: f32) -> bool {
        match self {
            Self::Button(index) => pad.button(index).pressed,
            Self::Axis { axis, direction } => pad.axis(axis.index()) * direction.sign() > axis_threshold,
        }
    }
}

/// One logical input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binding {
    pub key: KeyCode,
    pub gamepad: GamepadControl,
}

impl Binding {
    const fn button(key: KeyCode, index: usize) -> Self {
        Self {
            key,
            gamepad: GamepadControl::Button(index),
        }
    }

    const fn axis(key: KeyCode, axis: StickAxis, direction: AxisDirection) -> Self {
        Self {
            key,
            gamepad: GamepadControl::Axis { axis, direction },
        }
    }
}

/// Binding table for one context
#[derive(Debug, Clone, Default)]
pub struct BindingSet {
    bindings: HashMap<&'static str, Binding>,
}

impl BindingSet {
    /// The static binding table for a context
    pub fn for_context(kind: InputContextKind) -> Self {
        use AxisDirection::{Negative, Positive};

        let mut entries = vec![
            ("up", Binding::axis(KeyCode::W, StickAxis::Y, Negative)),
            ("down", Binding::axis(KeyCode::S, StickAxis::Y, Positive)),
            ("left", Binding::axis(KeyCode::A, StickAxis::X, Negative)),
            ("right", Binding::axis(KeyCode::D, StickAxis::X, Positive)),
        ];

        entries.extend(match kind {
            InputContextKind::World => vec![
                ("dash", Binding::button(KeyCode::Shift, 5)),
                ("interact", Binding::button(KeyCode::E, 0)),
                ("menu", Binding::button(KeyCode::Escape, 9)),
            ],
            InputContextKind::Battle => vec![
                ("confirm", Binding::button(KeyCode::Space, 0)),
                ("cancel", Binding::button(KeyCode::Escape, 1)),
                ("attack", Binding::button(KeyCode::J, 2)),
                ("special", Binding::button(KeyCode::K, 3)),
            ],
            InputContextKind::Map => vec![
                ("confirm", Binding::button(KeyCode::Enter, 0)),
                ("cancel", Binding::button(KeyCode::Escape, 1)),
                ("close", Binding::button(KeyCode::M, 9)),
            ],
        });

        Self {
            bindings: entries.into_iter().collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Binding> {
        self.bindings.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.bindings.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Keys bound to more than one action, sorted by action name
    pub fn duplicate_keys(&self) -> Vec<(KeyCode, Vec<&'static str>)> {
        let mut by_key: HashMap<KeyCode, Vec<&'static str>> = HashMap::new();
        for (name, binding) in &self.bindings {
            by_key.entry(binding.key).or_default().push(*name);
        }

        let mut duplicates: Vec<_> = by_key
            .into_iter()
            .filter(|(_, names)| names.len() > 1)
            .map(|(key, mut names)| {
                names.sort_unstable();
                (key, names)
            })
            .collect();
        duplicates.sort_by_key(|(_, names)| names[0]);
        duplicates
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pad_with_axes(x: f32, y: f32) -> GamepadState {
        GamepadState {
            id: 0,
            buttons: Vec::new(),
            axes: vec![x, y, 0.0, 0.0],
        }
    }

    #[test]
    fn test_every_context_binds_movement() {
        for kind in InputContextKind::ALL {
            let set = BindingSet::for_context(kind);
            for name in MOVEMENT_ACTIONS {
                assert!(set.get(name).is_some(), "{kind} is missing {name}");
            }
            assert!(set.duplicate_keys().is_empty(), "{kind} has duplicate keys");
        }
    }

    #[test]
    fn test_dash_only_bound_in_world() {
        assert!(BindingSet::for_context(InputContextKind::World).get("dash").is_some());
        assert!(BindingSet::for_context(InputContextKind::Battle).get("dash").is_none());
        assert!(BindingSet::for_context(InputContextKind::Map).get("dash").is_none());
    }

    #[test]
    fn test_context_parsing() {
        assert_eq!("battle".parse::<InputContextKind>(), Ok(InputContextKind::Battle));
        assert_eq!(
            "dungeon".parse::<InputContextKind>(),
            Err(UnknownContext("dungeon".to_string()))
        );
    }

    #[test]
    fn test_axis_control_respects_threshold_and_direction() {
        let left = GamepadControl::Axis {
            axis: StickAxis::X,
            direction: AxisDirection::Negative,
        };

        assert!(!left.is_active(&pad_with_axes(-0.3, 0.0), 0.3));
        assert!(left.is_active(&pad_with_axes(-0.31, 0.0), 0.3));
        assert!(!left.is_active(&pad_with_axes(0.9, 0.0), 0.3));
    }

    #[test]
    fn test_button_control_reads_pressed_flag() {
        let mut pad = pad_with_axes(0.0, 0.0);
        pad.buttons = vec![Default::default(); 6];
        pad.buttons[5].pressed = true;

        assert!(GamepadControl::Button(5).is_active(&pad, 0.3));
        assert!(!GamepadControl::Button(0).is_active(&pad, 0.3));
    }
}
