use clap::Parser;
use iced::keyboard::{self, key};
use iced::widget::{
    button, column, container, pick_list, row, scrollable, text, text_input, Column, Image, Row,
    Space,
};
use iced::event::{self, Event};
use iced::{Alignment, ContentFit, Element, Length, Subscription, Task, Theme};
use rfd::{FileDialog, MessageButtons, MessageDialog, MessageLevel};
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

use image_tagger::state::data::MainTag;
use image_tagger::state::session::{Action, Effect, Phase, Session};
use image_tagger::state::settings::Settings;
use image_tagger::state::table::RecordTable;
use image_tagger::ui::menu::{Command, Key, KeyPress, Menu};
use image_tagger::ui::picture::Picture;
use image_tagger::ui::viewport::Viewport;

const ABOUT_TEXT: &str = "Image Tagger shows the images listed in a TSV/CSV file and \
records a pass/fail tag for each one.\n\n\
Pick a main tag or press Ctrl+Shift+T / Ctrl+Shift+F to tag the selected image. \
Type a note in tag(sub) and press Enter to record a fail tag with that note. \
Every tag is written back to the listing immediately and the next image is selected.";

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(name = "image-tagger", version, about = "Tag images listed in a TSV/CSV file")]
struct Cli {
    /// Listing to open at start-up
    file: Option<PathBuf>,
}

/// Main application state
struct ImageTagger {
    /// The tagging workflow (record table, selection, tag inputs)
    session: Session,
    /// Zoom / fit state of the image view
    viewport: Viewport,
    /// Image currently on screen, or the blank placeholder
    picture: Picture,
    settings: Settings,
    /// Status message to display to the user
    status: String,
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    /// A menu entry or keyboard shortcut
    Command(Command),
    /// User clicked a row in the image list
    RowSelected(usize),
    MainTagPicked(MainTag),
    SubTagChanged(String),
    /// Enter pressed in the sub-tag input
    SubTagSubmitted,
}

impl ImageTagger {
    /// Create a new instance of the application
    fn new(file: Option<PathBuf>) -> (Self, Task<Message>) {
        let settings = Settings::load_or_default();

        let mut app = ImageTagger {
            session: Session::new(),
            viewport: Viewport::new(settings.fit_to_window),
            picture: Picture::placeholder(),
            settings,
            status: "Ready. Open a listing with Ctrl+O.".to_string(),
        };

        if let Some(path) = file {
            app.open_listing(path);
        }

        (app, Task::none())
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Command(command) => return self.run_command(command),
            Message::RowSelected(index) => self.apply(Action::Select(index)),
            Message::MainTagPicked(tag) => self.apply(Action::PickMainTag(tag)),
            Message::SubTagChanged(value) => self.apply(Action::EditSubTag(value)),
            Message::SubTagSubmitted => self.apply(Action::SubmitSubTag),
        }

        Task::none()
    }

    fn run_command(&mut self, command: Command) -> Task<Message> {
        match command {
            Command::Open => {
                let mut dialog = FileDialog::new()
                    .set_title("Open Listing")
                    .add_filter("Text Files", &["csv", "tsv", "txt"]);
                if let Some(dir) = &self.settings.last_dir {
                    dialog = dialog.set_directory(dir);
                }
                if let Some(path) = dialog.pick_file() {
                    self.open_listing(path);
                }
            }
            Command::Print => self.print(),
            Command::Exit => return iced::exit(),
            Command::TagTrue => self.apply(Action::TagTrue),
            Command::TagFalse => self.apply(Action::TagFalse),
            Command::Previous => self.apply(Action::Previous),
            Command::Next => self.apply(Action::Next),
            Command::ClearSelection => self.apply(Action::ClearSelection),
            Command::ZoomIn => self.viewport.zoom_in(),
            Command::ZoomOut => self.viewport.zoom_out(),
            Command::NormalSize => self.viewport.normal_size(),
            Command::FitToWindow => {
                self.viewport.toggle_fit_to_window();
                if self.settings.fit_to_window != self.viewport.fit_to_window {
                    self.settings.fit_to_window = self.viewport.fit_to_window;
                    self.save_settings();
                }
            }
            Command::About => {
                MessageDialog::new()
                    .set_level(MessageLevel::Info)
                    .set_title("About Image Tagger")
                    .set_description(ABOUT_TEXT)
                    .set_buttons(MessageButtons::Ok)
                    .show();
            }
        }

        Task::none()
    }

    /// Run one workflow action and carry out the effects it asks for
    fn apply(&mut self, action: Action) {
        let (session, effects) = std::mem::take(&mut self.session).dispatch(action);
        self.session = session;
        self.run_effects(effects);
    }

    fn run_effects(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Persist => self.persist(),
                Effect::ShowImage(path) => self.show_image(&path),
                Effect::ClearImage => {
                    self.picture = Picture::placeholder();
                    self.viewport.cleared();
                }
            }
        }
    }

    fn open_listing(&mut self, path: PathBuf) {
        match self.session.open(&path) {
            Ok(effects) => {
                let count = self.session.table().map_or(0, RecordTable::len);
                self.status = format!("Loaded {} images from {}", count, path.display());
                self.run_effects(effects);
                self.settings.remember_listing(&path);
                self.save_settings();
            }
            Err(e) => {
                error!("Failed to open listing: {}", e);
                self.status = format!("Could not open {}", path.display());
                show_error("Cannot Open Listing", &e.to_string());
            }
        }
    }

    fn persist(&mut self) {
        match self.session.persist() {
            Ok(()) => {
                if let Some(table) = self.session.table() {
                    self.status = format!("Saved {}", table.path().display());
                }
            }
            Err(e) => {
                error!("Failed to save tags: {}", e);
                self.status = "Saving tags failed; the edit is kept in memory.".to_string();
                show_error("Cannot Save Tags", &e.to_string());
            }
        }
    }

    fn show_image(&mut self, path: &Path) {
        match Picture::open(path) {
            Ok(picture) => {
                self.picture = picture;
                self.viewport.image_shown();
            }
            Err(e) => {
                warn!("{}", e);
                MessageDialog::new()
                    .set_level(MessageLevel::Info)
                    .set_title("Image Viewer")
                    .set_description(format!("Cannot load {}.", path.display()))
                    .set_buttons(MessageButtons::Ok)
                    .show();
            }
        }
    }

    fn print(&mut self) {
        if !self.viewport.can_print() {
            return;
        }
        let Some(target) = FileDialog::new()
            .set_title("Print to File")
            .add_filter("PNG image", &["png"])
            .set_file_name(self.picture.print_file_name())
            .save_file()
        else {
            return;
        };

        match self.picture.print_to(&target) {
            Ok(()) => {
                info!("Printed image to {}", target.display());
                self.status = format!("Printed to {}", target.display());
            }
            Err(e) => {
                error!("{}", e);
                show_error("Print Failed", &e.to_string());
            }
        }
    }

    fn save_settings(&self) {
        if let Err(e) = self.settings.save() {
            warn!("Failed to save settings: {}", e);
        }
    }

    fn is_enabled(&self, command: Command) -> bool {
        let has_rows = self.session.table().is_some_and(|table| !table.is_empty());
        let has_selection = matches!(self.session.phase(), Phase::Selected(_));

        match command {
            Command::Print => self.viewport.can_print(),
            Command::ZoomIn => self.viewport.can_zoom_in(),
            Command::ZoomOut => self.viewport.can_zoom_out(),
            Command::NormalSize => self.viewport.can_normal_size(),
            Command::FitToWindow => self.viewport.can_fit(),
            Command::Previous | Command::Next => has_rows,
            Command::TagTrue | Command::TagFalse | Command::ClearSelection => has_selection,
            Command::Open | Command::Exit | Command::About => true,
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let content = column![
            self.menu_bar(),
            row![
                self.image_list().width(Length::FillPortion(1)),
                self.center_panel().width(Length::FillPortion(3)),
                self.tag_panel().width(Length::FillPortion(1)),
            ]
            .spacing(10)
            .height(Length::Fill),
            text(self.status.as_str()).size(14),
        ]
        .spacing(10)
        .padding(10);

        container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    fn menu_bar(&self) -> Element<Message> {
        let mut bar = Row::new().spacing(6).align_y(Alignment::Center);

        for menu in Menu::ALL {
            bar = bar.push(text(format!("{}:", menu.title())).size(13));

            for &command in menu.commands() {
                let mut label = command.label();
                if command == Command::FitToWindow && self.viewport.fit_to_window {
                    label = format!("✓ {}", label);
                }
                if let Some(shortcut) = command.shortcut() {
                    label = format!("{}  {}", label, shortcut);
                }

                bar = bar.push(
                    button(text(label).size(13))
                        .on_press_maybe(self.is_enabled(command).then_some(Message::Command(command)))
                        .style(button::secondary)
                        .padding([4, 8]),
                );
            }

            bar = bar.push(Space::with_width(Length::Fixed(12.0)));
        }

        scrollable(bar)
            .direction(scrollable::Direction::Horizontal(scrollable::Scrollbar::new()))
            .width(Length::Fill)
            .into()
    }

    fn image_list(&self) -> Column<Message> {
        let selected = self.session.selected();
        let rows = self
            .session
            .table()
            .map(|table| table.records())
            .unwrap_or_default()
            .iter()
            .enumerate()
            .map(|(index, record)| {
                let style: fn(&Theme, button::Status) -> button::Style = if selected == Some(index) {
                    button::primary
                } else {
                    button::text
                };
                button(text(record.filename.as_str()).size(13))
                    .on_press(Message::RowSelected(index))
                    .style(style)
                    .width(Length::Fill)
                    .into()
            });

        column![scrollable(Column::with_children(rows)).height(Length::Fill)]
    }

    fn center_panel(&self) -> Column<Message> {
        let image = Image::new(self.picture.handle().clone());
        let image_view: Element<Message> = if self.viewport.fit_to_window {
            container(
                image
                    .content_fit(ContentFit::Contain)
                    .width(Length::Fill)
                    .height(Length::Fill),
            )
            .center(Length::Fill)
            .into()
        } else {
            let (width, height) = self.picture.dimensions();
            let (width, height) = self.viewport.scaled_size(width, height);
            scrollable(
                image
                    .content_fit(ContentFit::Fill)
                    .width(Length::Fixed(width))
                    .height(Length::Fixed(height)),
            )
            .direction(scrollable::Direction::Both {
                vertical: scrollable::Scrollbar::new(),
                horizontal: scrollable::Scrollbar::new(),
            })
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
        };

        let arrows = row![
            button("< Previous")
                .on_press_maybe(self.is_enabled(Command::Previous).then_some(Message::Command(Command::Previous)))
                .width(Length::Fill),
            button("Next >")
                .on_press_maybe(self.is_enabled(Command::Next).then_some(Message::Command(Command::Next)))
                .width(Length::Fill),
        ]
        .spacing(10);

        let record = self.session.selected_record();
        let details = column![
            detail_row("pred.", record.map_or("", |r| r.prediction.as_str())),
            detail_row("tag", record.map_or("", |r| r.tag_text())),
            detail_row("conf. score", record.map_or("", |r| r.score.as_str())),
        ]
        .spacing(4);

        column![image_view, arrows, details].spacing(10)
    }

    fn tag_panel(&self) -> Column<Message> {
        let main_tag = column![
            text("tag(main)"),
            pick_list(MainTag::ALL, Some(self.session.main_tag()), Message::MainTagPicked),
        ]
        .spacing(4);

        let sub_tag = column![
            text("tag(sub)"),
            text_input("note, Enter to save", self.session.sub_tag())
                .on_input(Message::SubTagChanged)
                .on_submit(Message::SubTagSubmitted),
        ]
        .spacing(4);

        column![main_tag, sub_tag].spacing(20)
    }

    fn subscription(&self) -> Subscription<Message> {
        // Listen to every key press, including those a focused text input
        // has captured, so shortcuts keep working while typing a sub tag.
        event::listen_with(|event, status, _window| {
            let Event::Keyboard(keyboard::Event::KeyPressed { key, modifiers, .. }) = event else {
                return None;
            };
            let key = match key.as_ref() {
                keyboard::Key::Named(key::Named::Escape) => Key::Escape,
                keyboard::Key::Character(chars) => Key::Char(chars.chars().next()?),
                _ => return None,
            };
            let press = KeyPress {
                key,
                command: modifiers.command(),
                shift: modifiers.shift(),
            };
            Command::for_shortcut(press, status == event::Status::Captured).map(Message::Command)
        })
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

/// A read-only labelled field below the image
fn detail_row<'a>(label: &'a str, value: &'a str) -> Row<'a, Message> {
    row![
        text(label).width(Length::Fixed(90.0)),
        text_input("", value).width(Length::Fill),
    ]
    .spacing(6)
    .align_y(Alignment::Center)
}

fn show_error(title: &str, description: &str) {
    MessageDialog::new()
        .set_level(MessageLevel::Error)
        .set_title(title)
        .set_description(description)
        .set_buttons(MessageButtons::Ok)
        .show();
}

fn main() -> iced::Result {
    image_tagger::logging::init();
    let cli = Cli::parse();

    iced::application("Image Tagger", ImageTagger::update, ImageTagger::view)
        .subscription(ImageTagger::subscription)
        .theme(ImageTagger::theme)
        .window_size((1200.0, 600.0))
        .centered()
        .run_with(move || ImageTagger::new(cli.file))
}
