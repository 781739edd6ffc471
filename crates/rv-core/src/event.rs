use std::collections::VecDeque;
use std::fmt;

use crate::flag::FlagValue;
use crate::mode::{GameMode, WorldMode};

/// Something observable that happened to the game state.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    // State store
    /// A flag was written.
    FlagChanged {
        /// Flag key.
        key: String,
        /// New value.
        value: FlagValue,
    },
    /// An interactable's state changed.
    InteractableStateChanged {
        /// Interactable id.
        id: String,
        /// Previous state.
        from: i64,
        /// New state.
        to: i64,
    },
    /// An interactable was consumed for the first time.
    InteractableConsumed {
        /// Interactable id.
        id: String,
    },
    /// An inventory count changed.
    InventoryChanged {
        /// Item id.
        item: String,
        /// Count after the change.
        count: u32,
    },

    // Modes
    /// The game mode changed.
    ModeChanged {
        /// Mode before the change.
        from: GameMode,
        /// Mode after the change.
        to: GameMode,
    },
    /// The world mode changed.
    WorldModeChanged {
        /// New world mode.
        mode: WorldMode,
    },

    // Dialogue
    /// A dialogue start was requested by an action or command.
    DialogueRequested {
        /// Requested dialogue id.
        dialogue_id: String,
    },
    /// A dialogue session began.
    DialogueStarted {
        /// Dialogue id.
        dialogue_id: String,
    },
    /// The session entered a node.
    NodeEntered {
        /// Dialogue id.
        dialogue_id: String,
        /// Node id.
        node_id: String,
    },
    /// A dialogue session finished.
    DialogueEnded {
        /// Dialogue id that just ended.
        dialogue_id: String,
    },

    // Requests to external collaborators
    /// A room/scene change was requested.
    RoomChangeRequested {
        /// Target scene.
        scene_id: String,
        /// Spawn point inside the scene.
        spawn_point: Option<String>,
    },
    /// A UI popup was requested.
    PopupRequested {
        /// Popup text.
        text: String,
    },
    /// A sound should start or stop.
    SoundRequested {
        /// Sound name.
        name: String,
        /// `true` to play, `false` to stop.
        play: bool,
    },
    /// The player equipped a mask.
    MaskEquipped {
        /// Mask id.
        mask_id: String,
    },
}

/// Handle returned by [`EventBus::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Handler = Box<dyn FnMut(&GameEvent)>;

/// Typed publish/subscribe dispatcher owned by the game context.
///
/// Subscribers run synchronously, in subscription order, when an event is
/// published. Every event is also appended to a log that pull-style
/// consumers [`drain`](EventBus::drain) once per step.
pub struct EventBus {
    subscribers: Vec<(SubscriptionId, Handler)>,
    next_id: u64,
    log: VecDeque<GameEvent>,
    max_events: usize,
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscribers.len())
            .field("pending", &self.log.len())
            .field("max_events", &self.max_events)
            .finish()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(1024)
    }
}

impl EventBus {
    /// Create a bus whose log keeps at most `max_events` (0 = unlimited).
    pub fn new(max_events: usize) -> Self {
        Self {
            subscribers: Vec::new(),
            next_id: 0,
            log: VecDeque::new(),
            max_events,
        }
    }

    /// Register a handler invoked for every published event.
    pub fn subscribe(&mut self, handler: impl FnMut(&GameEvent) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, Box::new(handler)));
        id
    }

    /// Remove a handler. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    /// Deliver `event` to every subscriber and append it to the log.
    pub fn publish(&mut self, event: GameEvent) {
        tracing::trace!(?event, "publish");
        for (_, handler) in &mut self.subscribers {
            handler(&event);
        }
        self.log.push_back(event);
        if self.max_events > 0 {
            while self.log.len() > self.max_events {
                self.log.pop_front();
            }
        }
    }

    /// Take every logged event, oldest first.
    pub fn drain(&mut self) -> Vec<GameEvent> {
        self.log.drain(..).collect()
    }

    /// Logged events not yet drained.
    pub fn events(&self) -> impl Iterator<Item = &GameEvent> {
        self.log.iter()
    }

    /// Number of logged events.
    pub fn len(&self) -> usize {
        self.log.len()
    }

    /// Whether the log is empty.
    pub fn is_empty(&self) -> bool {
        self.log.is_empty()
    }

    /// Number of registered subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn popup(text: &str) -> GameEvent {
        GameEvent::PopupRequested {
            text: text.to_string(),
        }
    }

    #[test]
    fn subscribers_see_events_in_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventBus::default();
        let sink = Rc::clone(&seen);
        bus.subscribe(move |e| sink.borrow_mut().push(e.clone()));

        bus.publish(popup("a"));
        bus.publish(popup("b"));

        assert_eq!(*seen.borrow(), vec![popup("a"), popup("b")]);
        assert_eq!(bus.drain(), vec![popup("a"), popup("b")]);
        assert!(bus.is_empty());
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let count = Rc::new(RefCell::new(0));
        let mut bus = EventBus::default();
        let c = Rc::clone(&count);
        let id = bus.subscribe(move |_| *c.borrow_mut() += 1);

        bus.publish(popup("x"));
        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));
        bus.publish(popup("y"));

        assert_eq!(*count.borrow(), 1);
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn log_is_bounded() {
        let mut bus = EventBus::new(2);
        for text in ["1", "2", "3"] {
            bus.publish(popup(text));
        }
        assert_eq!(bus.drain(), vec![popup("2"), popup("3")]);
    }
}
