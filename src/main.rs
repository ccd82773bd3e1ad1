use snowsports_roster::app::App;
use snowsports_roster::config;

fn main() -> iced::Result {
    if let Err(err) = config::init_logging() {
        eprintln!("logging disabled: {err}");
    }
    iced::application("Snowsports Roster", App::update, App::view)
        .theme(|app: &App| app.theme.clone())
        .window_size(iced::Size::new(1400.0, 800.0))
        .run_with(App::new)
}
