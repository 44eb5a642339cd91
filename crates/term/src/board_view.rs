//! BoardView: maps the playback render models into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.
//!
//! Layout: the 15x15 board framed on the left (3 columns per cell: letter
//! then points), a side
//! panel with session status and counts, the remaining tile rack under the
//! panel, and a notice line plus key help at the bottom.

use crate::core::{
    BoardCell, EnteringTile, EventStream, Notice, PlacedTile, PlaybackController, SessionStatus,
    TileRack,
};
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::{CellCategory, BLANK_LETTER, BOARD_SIZE};

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

const CELL_W: u16 = 3;
const PANEL_GAP: u16 = 2;
const MIN_PANEL_W: u16 = 16;

const BOARD_BG: Rgb = Rgb::new(24, 60, 48);
const TILE_BG: Rgb = Rgb::new(236, 214, 160);
const TILE_FG: Rgb = Rgb::new(30, 24, 16);
const WORD_BONUS_FG: Rgb = Rgb::new(180, 40, 40);
const LETTER_BONUS_FG: Rgb = Rgb::new(30, 80, 170);

fn category_style(category: CellCategory) -> CellStyle {
    let (fg, bg) = match category {
        CellCategory::Ordinary => (Rgb::new(90, 130, 110), BOARD_BG),
        CellCategory::DoubleLetter => (Rgb::new(20, 40, 60), Rgb::new(150, 200, 230)),
        CellCategory::TripleLetter => (Rgb::new(240, 240, 255), Rgb::new(40, 90, 180)),
        CellCategory::DoubleWord => (Rgb::new(60, 20, 30), Rgb::new(235, 160, 170)),
        CellCategory::TripleWord => (Rgb::new(255, 240, 230), Rgb::new(190, 50, 40)),
        CellCategory::Center => (Rgb::new(60, 20, 30), Rgb::new(235, 160, 170)),
    };
    CellStyle::new(fg, bg)
}

/// Snapshot of what the side panel shows
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelInfo {
    pub status: SessionStatus,
    pub session: u64,
    pub progress: Option<f64>,
    pub placed: Option<u32>,
    pub remaining: Option<u32>,
    pub words: u32,
    pub skipped: u32,
    pub control_enabled: bool,
}

impl PanelInfo {
    pub fn from_controller<S: EventStream>(playback: &PlaybackController<S>) -> Self {
        let stats = playback.stats();
        Self {
            status: playback.status(),
            session: playback.session(),
            progress: playback.progress(),
            placed: stats.map(|s| s.placed_tile_count),
            remaining: stats.map(|s| s.remaining_tile_count),
            words: playback.words_completed(),
            skipped: playback.skipped_events(),
            control_enabled: playback.control_enabled(),
        }
    }
}

/// Renders the board, rack and status panel.
#[derive(Debug, Clone, Default)]
pub struct BoardView {
    /// Leave empty premium cells unlabelled
    hide_badges: bool,
}

impl BoardView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn without_badges(mut self) -> Self {
        self.hide_badges = true;
        self
    }

    /// Render a controller's models into an existing framebuffer.
    pub fn render_into<S: EventStream>(
        &self,
        playback: &PlaybackController<S>,
        notice: Option<&Notice>,
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) {
        self.render_parts(
            playback.board().cells(),
            playback.entering(),
            playback.rack(),
            &PanelInfo::from_controller(playback),
            notice,
            viewport,
            fb,
        );
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render<S: EventStream>(
        &self,
        playback: &PlaybackController<S>,
        notice: Option<&Notice>,
        viewport: Viewport,
    ) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(playback, notice, viewport, &mut fb);
        fb
    }

    #[allow(clippy::too_many_arguments)]
    pub fn render_parts(
        &self,
        cells: impl Iterator<Item = BoardCell>,
        entering: &[EnteringTile],
        rack: &TileRack,
        panel: &PanelInfo,
        notice: Option<&Notice>,
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::default().cell(' '));

        let size = BOARD_SIZE as u16;
        let frame_w = size * CELL_W + 2;
        let frame_h = size + 2;
        let origin_x = 0;
        let origin_y = 0;

        fb.draw_box(origin_x, origin_y, frame_w, frame_h, CellStyle::default());
        for cell in cells {
            self.draw_cell(fb, origin_x, origin_y, &cell);
        }
        for e in entering {
            let style = CellStyle::new(TILE_FG, TILE_BG).dim();
            draw_tile(fb, origin_x, origin_y, e.row, e.col, &e.tile, style);
        }

        let panel_x = origin_x + frame_w + PANEL_GAP;
        if panel_x + MIN_PANEL_W <= viewport.width {
            let y = self.draw_panel(fb, panel_x, origin_y, panel);
            self.draw_rack(fb, panel_x, y + 1, viewport.width - panel_x, rack);
        }

        let footer_y = origin_y + frame_h;
        if let Some(notice) = notice {
            draw_notice(fb, origin_x, footer_y, notice);
        }
        let help = if panel.control_enabled {
            "g animate  p plain  r current  q quit"
        } else {
            "x cancel  q quit"
        };
        let dim = CellStyle::default().dim();
        fb.put_str(origin_x, footer_y.saturating_add(1), help, dim);
    }

    fn draw_cell(&self, fb: &mut FrameBuffer, ox: u16, oy: u16, cell: &BoardCell) {
        match cell.tile {
            Some(tile) => {
                let style = CellStyle::new(TILE_FG, TILE_BG).bold();
                draw_tile(fb, ox, oy, cell.row, cell.col, &tile, style);
            }
            None => {
                let style = category_style(cell.category);
                let x = ox + 1 + cell.col as u16 * CELL_W;
                let y = oy + 1 + cell.row as u16;
                fb.fill_rect(x, y, CELL_W, 1, ' ', style);
                let badge = if !cell.category.is_premium() {
                    "·"
                } else if self.hide_badges {
                    ""
                } else {
                    cell.category.badge()
                };
                let badge_w = badge.chars().count() as u16;
                fb.put_str(x + (CELL_W - badge_w) / 2, y, badge, style);
            }
        }
    }

    fn draw_panel(&self, fb: &mut FrameBuffer, x: u16, mut y: u16, panel: &PanelInfo) -> u16 {
        let label = CellStyle::default().bold();
        let value = CellStyle::default();

        fb.put_str(x, y, "STATUS", label);
        y += 1;
        let status_style = match panel.status {
            SessionStatus::Failed => CellStyle::new(Rgb::new(240, 90, 80), Rgb::default()),
            SessionStatus::Awaiting | SessionStatus::Active => {
                CellStyle::new(Rgb::new(120, 210, 140), Rgb::default())
            }
            _ => value,
        };
        let end = fb.put_str(x, y, panel.status.as_str(), status_style);
        if panel.session > 0 {
            let end = fb.put_str(end + 1, y, "#", value.dim());
            fb.put_u32(end, y, panel.session as u32, value.dim());
        }
        y += 2;

        if let Some(progress) = panel.progress {
            fb.put_str(x, y, "PROGRESS", label);
            y += 1;
            let pct = progress.clamp(0.0, 100.0).round() as u32;
            let end = fb.put_u32(x, y, pct, value);
            fb.put_char(end, y, '%', value);
            y += 2;
        }

        for (name, count) in [("PLACED", panel.placed), ("REMAINING", panel.remaining)] {
            fb.put_str(x, y, name, label);
            y += 1;
            match count {
                Some(n) => fb.put_u32(x, y, n, value),
                None => fb.put_str(x, y, "-", value),
            };
            y += 2;
        }

        fb.put_str(x, y, "WORDS", label);
        let end = fb.put_u32(x + 10, y, panel.words, value);
        if panel.skipped > 0 {
            let warn = CellStyle::new(Rgb::new(240, 200, 80), Rgb::default());
            let end = fb.put_str(end + 1, y, "skipped ", warn);
            fb.put_u32(end, y, panel.skipped, warn);
        }
        y + 1
    }

    fn draw_rack(&self, fb: &mut FrameBuffer, x: u16, mut y: u16, width: u16, rack: &TileRack) {
        let label = CellStyle::default().bold();
        let end = fb.put_str(x, y, "RACK ", label);
        let end = fb.put_u32(end, y, rack.len() as u32, label);
        if !rack.is_empty() {
            let dim = CellStyle::default().dim();
            let end = fb.put_str(end + 1, y, "(", dim);
            let end = fb.put_u32(end, y, rack.total_points(), dim);
            fb.put_str(end, y, " pts)", dim);
        }
        y += 1;

        // each tile takes "A1 " or "Q10 "
        let tile_style = CellStyle::new(TILE_FG, TILE_BG);
        let mut cx = x;
        for tile in rack.tiles() {
            let w = 2 + if tile.point_value >= 10 { 2 } else { 1 };
            if cx + w > x + width {
                cx = x;
                y += 1;
            }
            if y >= fb.height() {
                break;
            }
            fb.put_char(cx, y, tile.glyph(), tile_style.bold());
            let end = fb.put_u32(cx + 1, y, tile.point_value, tile_style.dim());
            cx = end + 1;
        }
    }
}

/// Letter in the first column of a cell, points after it. The points take
/// the colour of the multiplier the tile was laid on.
fn draw_tile(fb: &mut FrameBuffer, ox: u16, oy: u16, row: u8, col: u8, tile: &PlacedTile, style: CellStyle) {
    let x = ox + 1 + col as u16 * CELL_W;
    let y = oy + 1 + row as u16;
    fb.fill_rect(x, y, CELL_W, 1, ' ', style);
    let glyph = if tile.letter == BLANK_LETTER { '_' } else { tile.letter };
    fb.put_char(x, y, glyph, style);

    let mut points_style = style;
    if tile.word_multiplier > 1 {
        points_style.fg = WORD_BONUS_FG;
    } else if tile.letter_multiplier > 1 {
        points_style.fg = LETTER_BONUS_FG;
    }
    if tile.points < 100 {
        fb.put_u32(x + 1, y, tile.points, points_style);
    } else {
        fb.put_str(x + 1, y, "++", points_style);
    }
}

fn draw_notice(fb: &mut FrameBuffer, x: u16, y: u16, notice: &Notice) {
    match notice {
        Notice::Completed(stats) => {
            let style = CellStyle::new(Rgb::new(120, 210, 140), Rgb::default());
            let end = fb.put_str(x, y, "Puzzle ready: ", style);
            let end = fb.put_u32(end, y, stats.placed_tile_count, style);
            let end = fb.put_str(end, y, " placed, ", style);
            let end = fb.put_u32(end, y, stats.remaining_tile_count, style);
            fb.put_str(end, y, " remaining", style);
        }
        Notice::Failed(message) => {
            let style = CellStyle::new(Rgb::new(240, 90, 80), Rgb::default()).bold();
            let end = fb.put_str(x, y, "Generation failed: ", style);
            fb.put_str(end, y, message, style);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{PlaybackConfig, PuzzleSnapshot, ScriptedStream};
    use crate::types::Tile;

    fn idle() -> PlaybackController<ScriptedStream> {
        PlaybackController::new(PlaybackConfig::default())
    }

    #[test]
    fn empty_board_shows_badges() {
        let fb = BoardView::new().render(&idle(), None, Viewport::new(90, 24));
        // row 0: TW at col 0, DL at col 3
        let row = fb.row_text(1);
        assert!(row.starts_with("│TW "), "{row}");
        assert_eq!(&row.chars().skip(10).take(3).collect::<String>(), "DL ");
        let center = fb.row_text(8);
        assert_eq!(center.chars().nth(1 + 7 * 3 + 1), Some('★'));
    }

    #[test]
    fn placed_tiles_and_rack_render() {
        let mut playback = idle();
        let mut snap = PuzzleSnapshot::default();
        snap.cells[7][7] = Some(PlacedTile::new('Q', 10, 1, 2));
        snap.remaining_tiles = vec![Tile::new('A', 1), Tile::blank()];
        snap.placed_tile_count = 1;
        snap.remaining_tile_count = 2;
        playback.apply_plain(0, &snap);

        let fb = BoardView::new().render(&playback, None, Viewport::new(90, 24));
        let cell: String = fb.row_text(8).chars().skip(1 + 7 * 3).take(3).collect();
        assert_eq!(cell, "Q10");
        // laid on a double word
        assert_eq!(fb.get(1 + 7 * 3 + 1, 8).unwrap().style.fg, WORD_BONUS_FG);

        let text: String = (0..fb.height()).map(|y| fb.row_text(y)).collect::<Vec<_>>().join("\n");
        assert!(text.contains("RACK 2 (1 pts)"), "{text}");
        assert!(text.contains("A1 _0"));
    }

    #[test]
    fn failure_notice_is_shown() {
        let notice = Notice::Failed("event stream ended before generation completed".into());
        let fb = BoardView::new().render(&idle(), Some(&notice), Viewport::new(90, 24));
        assert!(fb.row_text(17).starts_with("Generation failed: event stream ended"));
    }

    #[test]
    fn narrow_viewport_skips_panel() {
        let fb = BoardView::new().render(&idle(), None, Viewport::new(48, 20));
        assert!(!fb.row_text(0).contains("STATUS"));
        let info = PanelInfo::from_controller(&idle());
        assert_eq!(info.placed, None);
        assert!(info.control_enabled);
    }
}
