//! Campus map with geolocation
//!
//! The screen never talks to the location service itself. Actions return a
//! [`MapCommand`] for the app to run in the background, and the outcomes
//! come back through the `on_*` handlers, which may hand a dialog back.

use std::time::Instant;

use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Rectangle},
        Block, Borders, Clear, Paragraph, Wrap,
    },
    Frame,
};

use crate::config::{MapConfig, MarkerConfig};
use crate::location::{LocationError, PermissionStatus, Position};
use crate::map::{Coordinate, Region, RegionAnimation, TileOverlay, RECENTER_DURATION};
use crate::ui::components::{Dialog, DialogAction, DialogButton};
use crate::ui::styles::Styles;
use crate::ui::theme::{Icons, Theme};

pub const LOCATE_LABEL: &str = "現在地を表示";
pub const REQUEST_LABEL: &str = "位置情報を許可";
pub const DEGRADED_OVERLAY: &str =
    "位置情報APIが利用できません。アプリを再インストールするか、開発者にお問い合わせください。";
pub const SETTINGS_LINK: &str = "設定を開く";

pub const PERMISSION_DIALOG_TITLE: &str = "許可が必要";
pub const PERMISSION_DIALOG_MESSAGE: &str =
    "地図機能を利用するには位置情報の許可が必要です。設定画面を開きますか？";
pub const LOCATION_ERROR_TITLE: &str = "位置情報エラー";

/// Fraction of the visible span moved per pan step
const PAN_STEP: f64 = 0.25;
const ZOOM_STEP: f64 = 0.5;

/// Background work the app should start for the map
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapCommand {
    RequestPermission,
    Locate,
}

/// Inline problem shown over the map
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapNotice {
    ApiUnavailable,
    ApiUnavailableRestart,
    PermissionCheckFailed,
    PermissionDenied,
    PermissionRequestFailed,
    LocateTimeout,
    ServicesDisabled,
    LocateFailed,
}

impl MapNotice {
    pub fn message(&self) -> &'static str {
        match self {
            MapNotice::ApiUnavailable => "位置情報APIが利用できないか、正しく初期化されていません。",
            MapNotice::ApiUnavailableRestart => "位置情報APIが利用できません。アプリを再起動してください。",
            MapNotice::PermissionCheckFailed => "位置情報の許可状態の確認に失敗しました。",
            MapNotice::PermissionDenied => {
                "位置情報の許可が必要です。アプリの設定から許可してください。"
            }
            MapNotice::PermissionRequestFailed => "位置情報の許可の確認中にエラーが発生しました。",
            MapNotice::LocateTimeout => {
                "位置情報の取得がタイムアウトしました。電波の良い場所で再度お試しください。"
            }
            MapNotice::ServicesDisabled => {
                "位置情報サービスが無効になっています。端末の設定を確認してください。"
            }
            MapNotice::LocateFailed => "位置情報の取得に失敗しました。",
        }
    }

    /// Permission and disabled-service problems can be fixed in settings
    pub fn offers_settings(&self) -> bool {
        matches!(
            self,
            MapNotice::PermissionCheckFailed
                | MapNotice::PermissionDenied
                | MapNotice::PermissionRequestFailed
                | MapNotice::ServicesDisabled
        )
    }

    fn from_locate_error(error: &LocationError) -> Self {
        match error {
            LocationError::Timeout => MapNotice::LocateTimeout,
            LocationError::ServicesDisabled => MapNotice::ServicesDisabled,
            _ => MapNotice::LocateFailed,
        }
    }
}

/// Result of feeding a background outcome into the screen
#[derive(Debug, Default)]
pub struct MapUpdate {
    pub command: Option<MapCommand>,
    pub dialog: Option<Dialog>,
}

pub struct MapScreen {
    styles: Styles,
    overlay: TileOverlay,
    marker: MarkerConfig,

    api_available: bool,
    permission_granted: bool,
    notice: Option<MapNotice>,
    is_getting_location: bool,
    permission_pending: bool,
    locate_after_grant: bool,

    region: Region,
    animation: Option<RegionAnimation>,
    user_position: Option<Coordinate>,
    spinner_frame: usize,
    settings_key: String,
}

impl MapScreen {
    /// `api_available` is the one-time capability check; false is permanent
    pub fn new(config: &MapConfig, api_available: bool, theme: Theme) -> Self {
        let notice = if api_available {
            None
        } else {
            tracing::error!("Location API unavailable, map runs degraded");
            Some(MapNotice::ApiUnavailable)
        };
        Self {
            styles: Styles::from_theme(theme),
            overlay: TileOverlay::new(config.tile_url.clone(), config.max_zoom, config.tile_size),
            marker: config.marker.clone(),
            api_available,
            permission_granted: false,
            notice,
            is_getting_location: false,
            permission_pending: false,
            locate_after_grant: false,
            region: config.initial_region,
            animation: None,
            user_position: None,
            spinner_frame: 0,
            settings_key: "o".to_string(),
        }
    }

    /// Key shown next to the inline settings link
    pub fn set_settings_key(&mut self, key: &str) {
        self.settings_key = key.to_string();
    }

    pub fn permission_granted(&self) -> bool {
        self.permission_granted
    }

    pub fn is_getting_location(&self) -> bool {
        self.is_getting_location
    }

    pub fn notice(&self) -> Option<&MapNotice> {
        self.notice.as_ref()
    }

    /// Region the map settles on once any animation finishes
    pub fn region(&self) -> Region {
        self.region
    }

    /// Region to draw at `now`
    pub fn visible_region(&self, now: Instant) -> Region {
        self.animation
            .as_ref()
            .map(|animation| animation.sample(now))
            .unwrap_or(self.region)
    }

    pub fn button_label(&self) -> &'static str {
        if self.permission_granted {
            LOCATE_LABEL
        } else {
            REQUEST_LABEL
        }
    }

    pub fn button_enabled(&self) -> bool {
        self.api_available && !self.is_getting_location && !self.permission_pending
    }

    /// Whether the inline notice currently offers a settings shortcut
    pub fn offers_settings(&self) -> bool {
        self.notice.as_ref().is_some_and(MapNotice::offers_settings)
    }

    pub fn on_permission_checked(&mut self, result: Result<PermissionStatus, LocationError>) {
        match result {
            Ok(status) => {
                tracing::info!(status = ?status, "Location permission checked");
                self.permission_granted = status.is_granted();
            }
            Err(e) => {
                tracing::error!(error = %e, "Permission check error");
                self.notice = Some(MapNotice::PermissionCheckFailed);
                self.permission_granted = false;
            }
        }
    }

    /// Button press: locate when granted, otherwise ask for permission
    pub fn primary_action(&mut self) -> Option<MapCommand> {
        if !self.button_enabled() {
            return None;
        }
        if self.permission_granted {
            self.locate()
        } else {
            self.request_permission()
        }
    }

    pub fn request_permission(&mut self) -> Option<MapCommand> {
        if !self.api_available {
            self.notice = Some(MapNotice::ApiUnavailableRestart);
            return None;
        }
        if self.permission_pending {
            return None;
        }
        self.notice = None;
        self.permission_pending = true;
        Some(MapCommand::RequestPermission)
    }

    /// Fetch the position, asking for permission first if needed
    pub fn locate(&mut self) -> Option<MapCommand> {
        if !self.api_available {
            self.notice = Some(MapNotice::ApiUnavailableRestart);
            return None;
        }
        if !self.permission_granted {
            let command = self.request_permission();
            self.locate_after_grant = command.is_some();
            return command;
        }
        if self.is_getting_location {
            return None;
        }
        self.notice = None;
        self.is_getting_location = true;
        Some(MapCommand::Locate)
    }

    pub fn on_permission_requested(
        &mut self,
        result: Result<PermissionStatus, LocationError>,
    ) -> MapUpdate {
        self.permission_pending = false;
        let locate_after_grant = std::mem::take(&mut self.locate_after_grant);

        match result {
            Ok(PermissionStatus::Granted) => {
                tracing::info!("Location permission granted");
                self.permission_granted = true;
                MapUpdate {
                    command: if locate_after_grant { self.locate() } else { None },
                    dialog: None,
                }
            }
            Ok(status) => {
                tracing::warn!(status = ?status, "Location permission not granted");
                self.permission_granted = false;
                self.notice = Some(MapNotice::PermissionDenied);
                MapUpdate {
                    command: None,
                    dialog: Some(permission_dialog()),
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "Permission request error");
                self.permission_granted = false;
                self.notice = Some(MapNotice::PermissionRequestFailed);
                MapUpdate::default()
            }
        }
    }

    pub fn on_position(&mut self, result: Result<Position, LocationError>) -> Option<Dialog> {
        self.on_position_at(result, Instant::now())
    }

    fn on_position_at(
        &mut self,
        result: Result<Position, LocationError>,
        now: Instant,
    ) -> Option<Dialog> {
        self.is_getting_location = false;
        match result {
            Ok(position) => {
                let target = Region::around_fix(position.coords);
                tracing::info!(
                    latitude = position.coords.latitude,
                    longitude = position.coords.longitude,
                    accuracy_m = ?position.accuracy_m,
                    "Location fix"
                );
                let from = self.visible_region(now);
                self.animation = Some(RegionAnimation::starting_at(
                    from,
                    target,
                    RECENTER_DURATION,
                    now,
                ));
                self.region = target;
                self.user_position = Some(position.coords);
                None
            }
            Err(e) => {
                tracing::error!(error = %e, "Get location error");
                let notice = MapNotice::from_locate_error(&e);
                let dialog = Dialog::alert(LOCATION_ERROR_TITLE, notice.message());
                self.notice = Some(notice);
                Some(dialog)
            }
        }
    }

    /// Advance the spinner and drop a finished animation
    pub fn tick(&mut self, now: Instant) {
        if self.is_getting_location {
            self.spinner_frame = self.spinner_frame.wrapping_add(1);
        }
        if self
            .animation
            .as_ref()
            .is_some_and(|animation| animation.is_finished(now))
        {
            self.animation = None;
        }
    }

    pub fn zoom_in(&mut self) {
        self.set_region(self.region.zoomed(ZOOM_STEP));
    }

    pub fn zoom_out(&mut self) {
        self.set_region(self.region.zoomed(1.0 / ZOOM_STEP));
    }

    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.set_region(self.region.panned(dx * PAN_STEP, dy * PAN_STEP));
    }

    fn set_region(&mut self, region: Region) {
        self.animation = None;
        self.region = region;
    }

    /// Clickable region of the action button
    pub fn button_area(area: Rect) -> Rect {
        let width = 20.min(area.width);
        Rect {
            x: area.x + area.width - width,
            y: area.y + area.height.saturating_sub(2),
            width,
            height: 1.min(area.height),
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        self.render_at(frame, area, Instant::now());
    }

    fn render_at(&self, frame: &mut Frame, area: Rect, now: Instant) {
        let region = self.visible_region(now);
        let zoom = self.overlay.zoom_for(&region);
        let tiles = self.overlay.visible_tiles(&region);
        let marker = self.marker.coordinate();
        let user = self.permission_granted.then_some(self.user_position).flatten();
        let [west, east] = region.x_bounds();
        let [south, north] = region.y_bounds();
        let palette = &self.styles.palette;

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.styles.border)
            .title(Span::styled(
                format!(" z{} {:.4}, {:.4} ", zoom, region.latitude, region.longitude),
                self.styles.muted_text,
            ));
        let inner = block.inner(area);
        // A bit more than one canvas row so the description lands below the title
        let row_span = (north - south) / f64::from(inner.height.saturating_sub(1).max(1)) * 1.2;

        let canvas = Canvas::default()
            .block(block)
            .background_color(palette.background)
            .x_bounds([west, east])
            .y_bounds([south, north])
            .paint(|ctx| {
                for tile in &tiles {
                    let (tile_west, tile_south, tile_east, tile_north) = tile.bounds();
                    ctx.draw(&Rectangle {
                        x: tile_west,
                        y: tile_south,
                        width: tile_east - tile_west,
                        height: tile_north - tile_south,
                        color: palette.border,
                    });
                }
                ctx.layer();
                ctx.print(
                    marker.longitude,
                    marker.latitude,
                    Line::from(vec![
                        Span::raw(Icons::PIN),
                        Span::styled(self.marker.title.clone(), self.styles.title),
                    ]),
                );
                if !self.marker.description.is_empty() {
                    ctx.print(
                        marker.longitude,
                        marker.latitude - row_span,
                        Span::styled(self.marker.description.clone(), self.styles.muted_text),
                    );
                }
                if let Some(user) = user {
                    ctx.print(
                        user.longitude,
                        user.latitude,
                        Span::styled("●", Style::default().fg(palette.info)),
                    );
                }
            });
        frame.render_widget(canvas, area);

        self.render_overlays(frame, inner);
        self.render_footer(frame, inner, region);
    }

    fn render_overlays(&self, frame: &mut Frame, inner: Rect) {
        let mut y = inner.y;
        let mut boxes: Vec<Vec<Line>> = Vec::new();
        if !self.api_available {
            boxes.push(vec![Line::from(Span::styled(
                DEGRADED_OVERLAY,
                self.styles.error_text,
            ))]);
        }
        if let Some(notice) = &self.notice {
            // Remediable notices are warnings, the rest are errors
            let style = if notice.offers_settings() {
                self.styles.warning_text
            } else {
                self.styles.error_text
            };
            let mut lines = vec![Line::from(Span::styled(notice.message(), style))];
            if notice.offers_settings() {
                lines.push(Line::from(vec![
                    Span::styled(format!("[{}] ", self.settings_key), self.styles.muted_text),
                    Span::styled(SETTINGS_LINK, self.styles.link),
                ]));
            }
            boxes.push(lines);
        }

        for lines in boxes {
            let height = (lines.len() as u16 + 1).min(inner.height.saturating_sub(y - inner.y));
            if height == 0 {
                break;
            }
            let overlay = Rect {
                x: inner.x,
                y,
                width: inner.width,
                height,
            };
            frame.render_widget(Clear, overlay);
            frame.render_widget(
                Paragraph::new(lines)
                    .style(self.styles.surface)
                    .wrap(Wrap { trim: true }),
                overlay,
            );
            y += height;
        }
    }

    fn render_footer(&self, frame: &mut Frame, inner: Rect, region: Region) {
        if inner.height == 0 {
            return;
        }
        let row = Rect {
            y: inner.y + inner.height - 1,
            height: 1,
            ..inner
        };
        let center_tile = self
            .overlay
            .tile_for(region.center(), self.overlay.zoom_for(&region));
        frame.render_widget(
            Paragraph::new(Span::styled(
                format!(
                    "{} ({}px)",
                    self.overlay.url(center_tile),
                    self.overlay.tile_size
                ),
                self.styles.muted_text,
            )),
            row,
        );

        let (label, style) = if self.is_getting_location {
            (
                format!(" {} ", crate::ui::spinner(self.spinner_frame)),
                self.styles.button,
            )
        } else if self.button_enabled() {
            (format!(" {} ", self.button_label()), self.styles.button)
        } else {
            (format!(" {} ", self.button_label()), self.styles.button_disabled)
        };
        frame.render_widget(
            Paragraph::new(Span::styled(label, style)).right_aligned(),
            row,
        );
    }
}

/// Remediation dialog after a denied permission request
fn permission_dialog() -> Dialog {
    Dialog::new(
        PERMISSION_DIALOG_TITLE,
        PERMISSION_DIALOG_MESSAGE,
        vec![
            DialogButton::new("キャンセル", DialogAction::Dismiss),
            DialogButton::new(SETTINGS_LINK, DialogAction::OpenSettings),
        ],
    )
}
