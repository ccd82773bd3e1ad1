pub mod nav_menu;
pub mod roster;
pub mod settings;

pub use nav_menu::nav_menu;
pub use roster::roster_screen;
pub use settings::settings_screen;
