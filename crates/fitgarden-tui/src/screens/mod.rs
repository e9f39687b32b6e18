//! Screen registry.

pub mod agenda;
pub mod booking_form;
pub mod production;

use crate::component::Component;
use crate::screen::ScreenId;

/// Instantiate every primary screen, keyed for the app's screen map.
pub fn create_screens() -> Vec<(ScreenId, Box<dyn Component>)> {
    vec![
        (ScreenId::Agenda, Box::new(agenda::AgendaScreen::new())),
        (
            ScreenId::Production,
            Box::new(production::ProductionScreen::new()),
        ),
    ]
}
