/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Build the next frame into `front` buffer (array of Cell)
///   2. Compare each cell with `back` buffer (previous frame)
///   3. Only emit terminal commands for cells that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back
///
/// The die spins at 80 ms per tick; a full-screen redraw at that rate
/// flickers, the diff does not.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::face::Face;
use crate::domain::rules;
use crate::sim::state::{GameState, Tone};

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Cell {
    /// Explicit dark background for every cell, so the terminal's own
    /// default never shows through between rows.
    const BASE_BG: Color = Color::Rgb { r: 26, g: 26, b: 26 };

    const BLANK: Cell = Cell { ch: ' ', fg: Color::White, bg: Cell::BASE_BG };

    /// Sentinel cell used to invalidate the back buffer.
    /// Different from any real cell, so every position will be diff'd.
    const INVALID: Cell = Cell { ch: '?', fg: Color::Magenta, bg: Color::Magenta };

    fn new(ch: char, fg: Color, bg: Color) -> Self {
        let bg = match bg {
            Color::Reset => Self::BASE_BG,
            other => other,
        };
        Cell { ch, fg, bg }
    }
}

// ── FrameBuffer: a 2D grid of Cells ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer {
            width: w,
            height: h,
            cells: vec![Cell::BLANK; w * h],
        }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![Cell::BLANK; w * h];
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Cell::BLANK
        }
    }

    /// Write a string at (x, y). Each char occupies 1 column.
    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color, bg: Color) {
        for (i, ch) in s.chars().enumerate() {
            if x + i >= self.width { break; }
            self.set(x + i, y, Cell::new(ch, fg, bg));
        }
    }

    /// Write a string centered on the panel.
    fn put_centered(&mut self, panel: &Panel, y: usize, s: &str, fg: Color, bg: Color) {
        let len = s.chars().count();
        let x = panel.left + PANEL_W.saturating_sub(len) / 2;
        self.put_str(x, y, s, fg, bg);
    }

    #[cfg(test)]
    fn row_text(&self, y: usize) -> String {
        (0..self.width).map(|x| self.get(x, y).ch).collect()
    }
}

// ── Layout ──

const PANEL_W: usize = 60;

const TITLE_ROW: usize = 1;
const SCORE_ROW: usize = 3;
const MESSAGE_ROW: usize = 5;
const DIE_ROW: usize = 7;
const DIE_H: usize = 5;
const SELECT_LABEL_ROW: usize = 14;
const SELECT_ROW: usize = 15;
const CONTROLS_ROW: usize = 17;
const HINT_ROW: usize = 19;
const RULES_ROW: usize = 22;

/// Horizontal placement of the centered game panel.
struct Panel {
    left: usize,
}

impl Panel {
    fn for_width(term_w: usize) -> Self {
        Panel { left: term_w.saturating_sub(PANEL_W) / 2 }
    }
}

// ── Palette (from the web original) ──

const GREEN: Color = Color::Rgb { r: 40, g: 167, b: 69 };
const RED: Color = Color::Rgb { r: 220, g: 53, b: 69 };
const BLUE: Color = Color::Rgb { r: 23, g: 162, b: 184 };
const AMBER: Color = Color::Rgb { r: 255, g: 193, b: 7 };
const ORANGE: Color = Color::Rgb { r: 255, g: 152, b: 0 };
const DIE_RED: Color = Color::Rgb { r: 255, g: 68, b: 68 };
const BUTTON: Color = Color::Rgb { r: 76, g: 175, b: 80 };
const RESTART: Color = Color::Rgb { r: 244, g: 67, b: 54 };
const DISABLED: Color = Color::Rgb { r: 90, g: 90, b: 90 };
const DIM: Color = Color::Rgb { r: 170, g: 170, b: 170 };
const FAINT: Color = Color::Rgb { r: 120, g: 120, b: 120 };

/// Colours cycled through while the die is spinning.
const SPIN_COLORS: [Color; 4] = [
    DIE_RED,
    Color::Rgb { r: 255, g: 140, b: 60 },
    Color::Rgb { r: 255, g: 220, b: 80 },
    Color::Rgb { r: 255, g: 110, b: 140 },
];

fn tone_color(tone: Tone) -> Color {
    match tone {
        Tone::Win => GREEN,
        Tone::Lose => RED,
        Tone::Prompt | Tone::Info | Tone::Rolling => BLUE,
    }
}

/// 3x3 pip layout for a face, row-major.
fn pips(face: Face) -> [[bool; 3]; 3] {
    const O: bool = false;
    const X: bool = true;
    match face.value() {
        1 => [[O, O, O], [O, X, O], [O, O, O]],
        2 => [[X, O, O], [O, O, O], [O, O, X]],
        3 => [[X, O, O], [O, X, O], [O, O, X]],
        4 => [[X, O, X], [O, O, O], [X, O, X]],
        5 => [[X, O, X], [O, X, O], [X, O, X]],
        _ => [[X, O, X], [X, O, X], [X, O, X]],
    }
}

// ── Renderer ──

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            SetBackgroundColor(Cell::BASE_BG),
            Clear(ClearType::All)
        )?;

        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.term_w = tw as usize;
        self.term_h = th as usize;
        self.front.resize(self.term_w, self.term_h);
        self.back.resize(self.term_w, self.term_h);
        // Force full repaint on first frame.
        self.back.cells.fill(Cell::INVALID);

        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(
            self.writer,
            ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    pub fn render(&mut self, state: &GameState) -> io::Result<()> {
        // Detect terminal resize
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.term_w = tw as usize;
            self.term_h = th as usize;
            self.front.resize(self.term_w, self.term_h);
            self.back.resize(self.term_w, self.term_h);
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
        }

        self.front.clear();
        compose(&mut self.front, state);

        self.flush_diff()?;
        std::mem::swap(&mut self.front, &mut self.back);

        Ok(())
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = Cell::BASE_BG;
        let mut cursor_at: Option<(usize, usize)> = None;

        // Explicit base colors; ResetColor would fall back to the
        // terminal's own default.
        queue!(self.writer,
            SetForegroundColor(Color::White),
            SetBackgroundColor(Cell::BASE_BG),
        )?;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let cell = self.front.get(x, y);
                if cell == self.back.get(x, y) {
                    continue;
                }

                if cursor_at != Some((x, y)) {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                }
                if cell.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = cell.fg;
                }
                if cell.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                    last_bg = cell.bg;
                }

                queue!(self.writer, Print(cell.ch))?;
                cursor_at = Some((x + 1, y));
            }
        }

        self.writer.flush()
    }
}

// ── Compose: build frame content from a state snapshot ──

fn compose(buf: &mut FrameBuffer, s: &GameState) {
    let panel = Panel::for_width(buf.width);

    buf.put_centered(&panel, TITLE_ROW, &format!("{}  DICE GAME  {}", s.shown_face.symbol(), s.shown_face.symbol()), Color::White, Color::Reset);

    let score = format!("Score: {}", s.score);
    let high = format!("High Score: {}", s.high_score);
    buf.put_str(panel.left + 8, SCORE_ROW, &score, Color::White, Color::Reset);
    buf.put_str(panel.left + PANEL_W - 8 - high.chars().count(), SCORE_ROW, &high, AMBER, Color::Reset);

    buf.put_centered(&panel, MESSAGE_ROW, &s.message.text, tone_color(s.message.tone), Color::Reset);

    compose_die(buf, &panel, s);
    compose_selector(buf, &panel, s);
    compose_controls(buf, &panel, s);

    let sel = s.selected;
    let hit = format!("Correct guess: +{} points", rules::win_points(sel));
    let miss = format!("Wrong guess: -{} points (minimum score: 0)", rules::loss_points(sel));
    buf.put_centered(&panel, HINT_ROW, &hit, DIM, Color::Reset);
    buf.put_centered(&panel, HINT_ROW + 1, &miss, DIM, Color::Reset);

    compose_rules(buf, &panel);

    let footer = "1-6 select   \u{2190}\u{2192} change   ENTER roll   R restart   Q quit";
    let footer_row = buf.height.saturating_sub(1).max(RULES_ROW + 8);
    buf.put_centered(&panel, footer_row, footer, FAINT, Color::Reset);
}

fn compose_die(buf: &mut FrameBuffer, panel: &Panel, s: &GameState) {
    const DIE_W: usize = 13;
    let color = if s.rolling {
        SPIN_COLORS[s.spin_count as usize % SPIN_COLORS.len()]
    } else {
        DIE_RED
    };
    let x0 = panel.left + (PANEL_W - DIE_W) / 2;
    let layout = pips(s.shown_face);

    buf.put_str(x0, DIE_ROW, "╭───────────╮", color, Color::Reset);
    for (r, row) in layout.iter().enumerate() {
        let mut line = String::from("│");
        for &pip in row {
            line.push_str(if pip { " ● " } else { "   " });
        }
        line.push_str(" │");
        // Pad the 9-column pip grid to the 11-column interior.
        let line = line.replacen('│', "│ ", 1);
        buf.put_str(x0, DIE_ROW + 1 + r, &line, color, Color::Reset);
    }
    buf.put_str(x0, DIE_ROW + DIE_H - 1, "╰───────────╯", color, Color::Reset);
}

fn compose_selector(buf: &mut FrameBuffer, panel: &Panel, s: &GameState) {
    buf.put_centered(panel, SELECT_LABEL_ROW, "Select your number:", Color::White, Color::Reset);

    // Six buttons " n " separated by two spaces
    let total_w = 6 * 5 + 5 * 2;
    let mut x = panel.left + (PANEL_W - total_w) / 2;
    for face in Face::all() {
        let label = format!("  {face}  ");
        let (fg, bg) = if face == s.selected {
            (Color::Black, if s.rolling { DISABLED } else { ORANGE })
        } else if s.rolling {
            (FAINT, Color::Rgb { r: 50, g: 50, b: 50 })
        } else {
            (Color::White, BUTTON)
        };
        buf.put_str(x, SELECT_ROW, &label, fg, bg);
        x += 7;
    }
}

fn compose_controls(buf: &mut FrameBuffer, panel: &Panel, s: &GameState) {
    let (roll_label, roll_bg) = if s.rolling {
        ("  Rolling...  ", DISABLED)
    } else {
        ("  Roll Dice  ", GREEN)
    };
    // Restart is always available, even mid-roll.
    let restart_label = "  Restart  ";
    let gap = 4;
    let total = roll_label.chars().count() + gap + restart_label.chars().count();
    let x = panel.left + (PANEL_W - total) / 2;
    buf.put_str(x, CONTROLS_ROW, roll_label, Color::White, roll_bg);
    buf.put_str(x + roll_label.chars().count() + gap, CONTROLS_ROW, restart_label, Color::White, RESTART);
}

fn compose_rules(buf: &mut FrameBuffer, panel: &Panel) {
    const LINES: [&str; 6] = [
        "Select a number from 1 to 6",
        "Press ENTER to roll once",
        "Guess right: earn the number x 10 points",
        "Guess wrong: lose points equal to your number",
        "Your score cannot go below 0",
        "Try to achieve the highest score possible!",
    ];
    let box_bg = Color::Rgb { r: 18, g: 18, b: 18 };
    let x = panel.left + 6;
    let w = PANEL_W - 12;
    for r in 0..LINES.len() + 2 {
        for c in 0..w {
            buf.set(x + c, RULES_ROW + r, Cell::new(' ', Color::White, box_bg));
        }
    }
    buf.put_str(x + 2, RULES_ROW, "How to Play:", Color::White, box_bg);
    for (i, line) in LINES.iter().enumerate() {
        buf.put_str(x + 2, RULES_ROW + 1 + i, &format!("\u{2022} {line}"), FAINT, box_bg);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Message;

    fn frame(state: &GameState) -> FrameBuffer {
        let mut buf = FrameBuffer::new(80, 32);
        compose(&mut buf, state);
        buf
    }

    #[test]
    fn shows_score_high_score_and_message() {
        let mut s = GameState::new();
        s.score = 95;
        s.high_score = 130;
        let buf = frame(&s);
        let row = buf.row_text(SCORE_ROW);
        assert!(row.contains("Score: 95"));
        assert!(row.contains("High Score: 130"));
        assert!(buf.row_text(MESSAGE_ROW).contains(rules::INITIAL_PROMPT));
    }

    #[test]
    fn roll_button_label_follows_state() {
        let mut s = GameState::new();
        assert!(frame(&s).row_text(CONTROLS_ROW).contains("Roll Dice"));
        s.rolling = true;
        s.message = Message::new(rules::ROLLING, Tone::Rolling);
        let row = frame(&s).row_text(CONTROLS_ROW);
        assert!(row.contains("Rolling..."));
        assert!(row.contains("Restart"));
    }

    #[test]
    fn selected_button_is_highlighted() {
        let mut s = GameState::new();
        s.selected = Face::new(4).unwrap();
        let buf = frame(&s);
        let row = buf.row_text(SELECT_ROW);
        let col = row.find('4').unwrap();
        assert_eq!(buf.get(col, SELECT_ROW).bg, ORANGE);
        let other = row.find('2').unwrap();
        assert_eq!(buf.get(other, SELECT_ROW).bg, BUTTON);
    }

    #[test]
    fn hints_track_selection() {
        let mut s = GameState::new();
        s.selected = Face::new(5).unwrap();
        let buf = frame(&s);
        assert!(buf.row_text(HINT_ROW).contains("+50"));
        assert!(buf.row_text(HINT_ROW + 1).contains("-5 points"));
    }

    #[test]
    fn die_shows_pips_of_face() {
        let mut s = GameState::new();
        s.shown_face = Face::new(6).unwrap();
        let buf = frame(&s);
        let pips: usize = (DIE_ROW..DIE_ROW + DIE_H)
            .map(|y| buf.row_text(y).matches('●').count())
            .sum();
        assert_eq!(pips, 6);
    }

    #[test]
    fn die_rows_are_aligned() {
        let buf = frame(&GameState::new());
        let widths: Vec<usize> = (DIE_ROW..DIE_ROW + DIE_H)
            .map(|y| buf.row_text(y).trim_end().chars().count())
            .collect();
        assert!(widths.windows(2).all(|w| w[0] == w[1]));
    }

    #[test]
    fn tiny_terminal_does_not_panic() {
        let mut buf = FrameBuffer::new(10, 4);
        compose(&mut buf, &GameState::new());
    }
}
