//! Application callbacks for received events.

use std::collections::BTreeMap;
use std::fmt;

use icecap_proto::Event;
use icecap_state::StateStore;

/// Callback run for an event once the state store reflects it.
pub type EventHandler = Box<dyn FnMut(&StateStore, &Event) + Send>;

/// Event handlers by event name, run in registration order.
#[derive(Default)]
pub(crate) struct Subscribers {
    by_name: BTreeMap<String, Vec<EventHandler>>,
}

impl Subscribers {
    pub(crate) fn add(&mut self, name: String, handler: EventHandler) {
        self.by_name.entry(name).or_default().push(handler);
    }

    pub(crate) fn notify(&mut self, state: &StateStore, event: &Event) {
        if let Some(handlers) = self.by_name.get_mut(event.name()) {
            for handler in handlers {
                handler(state, event);
            }
        }
    }
}

impl fmt::Debug for Subscribers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.by_name.iter().map(|(name, handlers)| (name, handlers.len())))
            .finish()
    }
}
