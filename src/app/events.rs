//! Event handling for keyboard and mouse input
//!
//! This module contains all event handling logic for the App.

use crossterm::event::{
    Event, KeyCode, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use crate::keybindings::KeyAction;
use crate::navigation::{swipe_from_drag, ScreenKind, Swipe};
use crate::screens::MapScreen;
use crate::ui::components::{Dialog, ErrorScreen, Header, TabBarHit};
use crate::ui::layout::contains;

use super::App;

const SETTINGS_TITLE: &str = "Settings";
const SETTINGS_MESSAGE: &str = "Settings menu would open here.";
const PROFILE_TITLE: &str = "Profile";
const PROFILE_MESSAGE: &str = "Profile screen/modal would open here.";

impl App {
    pub(super) fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                self.handle_key(key.code, key.modifiers);
            }
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            _ => {}
        }
    }

    pub(super) fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) {
        // Use keybinding resolver to determine action
        let action = self.keybinding_resolver.resolve(code, modifiers);

        // Fallback screen only knows retry and quit
        if self.faults.is_faulted() {
            match action {
                KeyAction::Execute => self.retry(),
                KeyAction::Quit | KeyAction::Cancel => self.should_quit = true,
                _ => {}
            }
            return;
        }

        // Ctrl+C always quits
        if matches!(action, KeyAction::Cancel) {
            self.should_quit = true;
            return;
        }

        // Dialogs are modal
        if self.dialog.is_some() {
            self.handle_dialog_key(code, action);
            return;
        }

        match action {
            KeyAction::Quit => self.should_quit = true,
            KeyAction::NextTab => self.navigator.swipe(Swipe::Left),
            KeyAction::PrevTab => self.navigator.swipe(Swipe::Right),
            KeyAction::GoToTab(index) => {
                self.navigator.jump_to(index);
            }
            KeyAction::Settings => self.show_settings(),
            KeyAction::Profile => self.show_profile(),
            KeyAction::OpenDeviceSettings => {
                if self.active_screen() == ScreenKind::Map && self.map.offers_settings() {
                    self.open_device_settings();
                }
            }
            KeyAction::MoveUp => self.handle_up(),
            KeyAction::MoveDown => self.handle_down(),
            KeyAction::MoveLeft => self.handle_left(),
            KeyAction::MoveRight => self.handle_right(),
            KeyAction::Execute => self.handle_enter(),
            KeyAction::ZoomIn if self.active_screen() == ScreenKind::Map => self.map.zoom_in(),
            KeyAction::ZoomOut if self.active_screen() == ScreenKind::Map => self.map.zoom_out(),
            _ => {}
        }
    }

    fn handle_dialog_key(&mut self, code: KeyCode, action: KeyAction) {
        let Some(dialog) = self.dialog.as_mut() else {
            return;
        };

        if code == KeyCode::Esc {
            let cancel = dialog.cancel_action();
            self.apply_dialog_action(cancel);
            return;
        }

        match action {
            KeyAction::MoveLeft | KeyAction::PrevTab => dialog.select_prev(),
            KeyAction::MoveRight | KeyAction::NextTab => dialog.select_next(),
            KeyAction::Execute => {
                let selected = dialog.selected_action();
                self.apply_dialog_action(selected);
            }
            _ => {}
        }
    }

    pub(super) fn handle_mouse(&mut self, mouse: MouseEvent) {
        let Some(layout) = self.current_layout.clone() else {
            return;
        };
        let (x, y) = (mouse.column, mouse.row);
        let screen = layout.header.union(layout.tab_bar);

        if self.faults.is_faulted() {
            if mouse.kind == MouseEventKind::Down(MouseButton::Left)
                && contains(ErrorScreen::retry_area(screen), x, y)
            {
                self.retry();
            }
            return;
        }

        // Dialogs swallow every click outside their buttons
        if let Some(dialog) = &self.dialog {
            if mouse.kind == MouseEventKind::Down(MouseButton::Left) {
                if let Some(action) = dialog.hit(screen, x, y) {
                    self.apply_dialog_action(action);
                }
            }
            return;
        }

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if contains(Header::settings_area(layout.header), x, y) {
                    self.show_settings();
                    return;
                }

                if let Some(hit) = self.tab_bar.hit(layout.tab_bar, x, y) {
                    match hit {
                        TabBarHit::Tab(name) => {
                            self.navigator.navigate(name);
                        }
                        TabBarHit::Profile => self.show_profile(),
                    }
                    return;
                }

                if contains(layout.content, x, y) {
                    self.drag_origin = Some(x);
                    self.handle_content_click(layout.content, x, y);
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                if let Some(origin) = self.drag_origin.take() {
                    if let Some(swipe) = swipe_from_drag(origin, x) {
                        self.navigator.swipe(swipe);
                    }
                }
            }
            MouseEventKind::ScrollUp if contains(layout.content, x, y) => self.handle_up(),
            MouseEventKind::ScrollDown if contains(layout.content, x, y) => self.handle_down(),
            _ => {}
        }
    }

    fn handle_content_click(&mut self, content: ratatui::layout::Rect, x: u16, y: u16) {
        match self.active_screen() {
            ScreenKind::Timetable => {
                if let Some(day) = self.timetable.day_at(content, x, y) {
                    self.timetable.select_day(day);
                }
            }
            ScreenKind::Map => {
                if contains(MapScreen::button_area(content), x, y) {
                    self.press_map_button();
                }
            }
            _ => {}
        }
    }

    fn active_screen(&self) -> ScreenKind {
        self.navigator.active().screen
    }

    fn retry(&mut self) {
        tracing::info!("Retrying after error");
        self.faults.reset();
    }

    fn show_settings(&mut self) {
        tracing::info!("Settings pressed");
        self.show_dialog(Dialog::alert(SETTINGS_TITLE, SETTINGS_MESSAGE));
    }

    fn show_profile(&mut self) {
        tracing::info!("Profile pressed");
        self.show_dialog(Dialog::alert(PROFILE_TITLE, PROFILE_MESSAGE));
    }

    fn press_map_button(&mut self) {
        if let Some(command) = self.map.primary_action() {
            self.run_map_command(command);
        }
    }

    fn handle_up(&mut self) {
        match self.active_screen() {
            ScreenKind::Classes => self.classes.scroll_up(),
            ScreenKind::Map => self.map.pan(0.0, 1.0),
            _ => {}
        }
    }

    fn handle_down(&mut self) {
        match self.active_screen() {
            ScreenKind::Classes => self.classes.scroll_down(),
            ScreenKind::Map => self.map.pan(0.0, -1.0),
            _ => {}
        }
    }

    fn handle_left(&mut self) {
        match self.active_screen() {
            ScreenKind::Timetable => self.timetable.select_prev_day(),
            ScreenKind::Map => self.map.pan(-1.0, 0.0),
            _ => {}
        }
    }

    fn handle_right(&mut self) {
        match self.active_screen() {
            ScreenKind::Timetable => self.timetable.select_next_day(),
            ScreenKind::Map => self.map.pan(1.0, 0.0),
            _ => {}
        }
    }

    fn handle_enter(&mut self) {
        if self.active_screen() == ScreenKind::Map {
            self.press_map_button();
        }
    }
}
