use std::collections::HashMap;

use foundation::math::Vec2;

/// Pointer input kinds an action can be registered for.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ScreenSpaceEventType {
    LeftClick,
    RightClick,
    MouseMove,
}

impl ScreenSpaceEventType {
    pub const ALL: [ScreenSpaceEventType; 3] = [
        ScreenSpaceEventType::LeftClick,
        ScreenSpaceEventType::RightClick,
        ScreenSpaceEventType::MouseMove,
    ];
}

/// Raw pointer input in canvas pixels.
///
/// Clicks carry `position`; moves carry `start_position` and `end_position`.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct ScreenInput {
    pub position: Option<Vec2>,
    pub start_position: Option<Vec2>,
    pub end_position: Option<Vec2>,
}

impl ScreenInput {
    pub fn click(position: Vec2) -> Self {
        Self {
            position: Some(position),
            ..Self::default()
        }
    }

    pub fn motion(start: Vec2, end: Vec2) -> Self {
        Self {
            position: None,
            start_position: Some(start),
            end_position: Some(end),
        }
    }

    /// The pixel an event of `kind` should be resolved at.
    pub fn screen_position(&self, kind: ScreenSpaceEventType) -> Option<Vec2> {
        match kind {
            ScreenSpaceEventType::LeftClick | ScreenSpaceEventType::RightClick => self.position,
            ScreenSpaceEventType::MouseMove => self.end_position,
        }
    }
}

/// Input actions keyed by event type.
///
/// Registering for a type that already has an action replaces it; actions
/// never accumulate.
#[derive(Debug)]
pub struct ScreenSpaceEventHandler<A> {
    actions: HashMap<ScreenSpaceEventType, A>,
}

impl<A> Default for ScreenSpaceEventHandler<A> {
    fn default() -> Self {
        Self {
            actions: HashMap::new(),
        }
    }
}

impl<A> ScreenSpaceEventHandler<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the action previously registered for `kind`, if any.
    pub fn set_input_action(&mut self, action: A, kind: ScreenSpaceEventType) -> Option<A> {
        self.actions.insert(kind, action)
    }

    pub fn remove_input_action(&mut self, kind: ScreenSpaceEventType) -> Option<A> {
        self.actions.remove(&kind)
    }

    pub fn input_action(&self, kind: ScreenSpaceEventType) -> Option<&A> {
        self.actions.get(&kind)
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::{ScreenInput, ScreenSpaceEventHandler, ScreenSpaceEventType};
    use foundation::math::Vec2;

    #[test]
    fn registration_overwrites_by_type() {
        let mut handler = ScreenSpaceEventHandler::new();
        assert_eq!(handler.set_input_action(1, ScreenSpaceEventType::LeftClick), None);
        assert_eq!(handler.set_input_action(2, ScreenSpaceEventType::LeftClick), Some(1));
        assert_eq!(handler.len(), 1);
        assert_eq!(handler.input_action(ScreenSpaceEventType::LeftClick), Some(&2));
    }

    #[test]
    fn remove_unregistered_is_none() {
        let mut handler: ScreenSpaceEventHandler<u8> = ScreenSpaceEventHandler::new();
        assert_eq!(handler.remove_input_action(ScreenSpaceEventType::MouseMove), None);
        assert!(handler.is_empty());
    }

    #[test]
    fn moves_resolve_at_end_position() {
        let input = ScreenInput::motion(Vec2::new(1.0, 1.0), Vec2::new(5.0, 6.0));
        assert_eq!(
            input.screen_position(ScreenSpaceEventType::MouseMove),
            Some(Vec2::new(5.0, 6.0))
        );
        assert_eq!(input.screen_position(ScreenSpaceEventType::LeftClick), None);
    }
}
