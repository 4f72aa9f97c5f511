use crate::display::{piece_symbol, rank_squares, ranks_top_down, status_lines};
use arbiter_core::{Color, File, Move, PositionOracle, Rank, Square};
use arbiter_session::{GameManager, Mode, ProposedMove};
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    style::{Color as TermColor, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
    ExecutableCommand,
};
use std::io::{self, Write};
use std::time::Duration;
use tracing::warn;

/// How long to wait for a key when no computer reply is scheduled.
const IDLE_POLL: Duration = Duration::from_millis(250);

/// Full-screen board driven with vim keys.
pub struct InteractiveGame {
    manager: GameManager,
    /// (file, rank), each 0-7
    cursor: (u8, u8),
    selected: Option<Square>,
    targets: Vec<Move>,
    message: String,
}

impl InteractiveGame {
    pub fn new(manager: GameManager) -> Self {
        Self {
            manager,
            cursor: (4, 1), // e2
            selected: None,
            targets: Vec::new(),
            message: String::from("hjkl moves the cursor, Enter picks a piece and drops it"),
        }
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        stdout.execute(Hide)?;
        stdout.execute(Clear(ClearType::All))?;

        let result = self.game_loop();

        stdout.execute(Show)?;
        terminal::disable_raw_mode()?;
        stdout.execute(Clear(ClearType::All))?;
        stdout.execute(MoveTo(0, 0))?;

        result
    }

    fn game_loop(&mut self) -> io::Result<()> {
        loop {
            self.draw_board()?;

            let timeout = self.manager.time_until_opponent().unwrap_or(IDLE_POLL);
            if !event::poll(timeout)? {
                self.computer_move();
                continue;
            }

            if let Event::Key(KeyEvent {
                code,
                kind: KeyEventKind::Press,
                ..
            }) = event::read()?
            {
                match code {
                    KeyCode::Char('q') | KeyCode::Esc => break,
                    KeyCode::Char('h') | KeyCode::Left => self.move_cursor(-1, 0),
                    KeyCode::Char('j') | KeyCode::Down => self.move_cursor(0, -1),
                    KeyCode::Char('k') | KeyCode::Up => self.move_cursor(0, 1),
                    KeyCode::Char('l') | KeyCode::Right => self.move_cursor(1, 0),
                    KeyCode::Enter | KeyCode::Char(' ') => self.handle_selection(),
                    KeyCode::Char('m') => self.toggle_mode(),
                    KeyCode::Char('n') => self.new_game(),
                    _ => {}
                }
            }
        }

        Ok(())
    }

    fn cursor_square(&self) -> Option<Square> {
        let file = File::new(self.cursor.0)?;
        let rank = Rank::new(self.cursor.1)?;
        Some(Square::new(file, rank))
    }

    fn move_cursor(&mut self, dx: i8, dy: i8) {
        let file = self.cursor.0 as i8 + dx;
        let rank = self.cursor.1 as i8 + dy;

        if (0..8).contains(&file) && (0..8).contains(&rank) {
            self.cursor = (file as u8, rank as u8);
        }
    }

    fn clear_selection(&mut self) {
        self.selected = None;
        self.targets.clear();
    }

    fn handle_selection(&mut self) {
        let Some(cursor_square) = self.cursor_square() else {
            return;
        };

        if let Some(from) = self.selected {
            if self.targets.iter().any(|m| m.to == cursor_square) {
                self.clear_selection();
                match self.manager.propose_move(ProposedMove::new(from, cursor_square)) {
                    Ok(outcome) => self.message = format!("Played {}", outcome.record.notation),
                    Err(err) => self.message = err.to_string(),
                }
                return;
            }
            self.clear_selection();
        }

        let snapshot = self.manager.snapshot();
        if snapshot.is_game_over() || snapshot.opponent_pending {
            return;
        }

        let position = self.manager.session().position();
        if let Some(piece) = position.piece_at(cursor_square) {
            if piece.color == snapshot.side_to_move {
                self.targets = self
                    .manager
                    .oracle()
                    .legal_moves(position)
                    .into_iter()
                    .filter(|m| m.from == cursor_square)
                    .collect();
                self.selected = Some(cursor_square);
                self.message = format!("Selected {} at {}", piece.piece_type.name(), cursor_square);
            }
        }
    }

    fn computer_move(&mut self) {
        match self.manager.poll_opponent() {
            Ok(Some(outcome)) => {
                self.message = format!("Computer played {}", outcome.record.notation)
            }
            Ok(None) => {}
            Err(err) => {
                warn!(%err, "computer could not move");
                self.message = err.to_string();
            }
        }
    }

    fn toggle_mode(&mut self) {
        let mode = match self.manager.session().mode() {
            Mode::Cpu => Mode::Friend,
            Mode::Friend => Mode::Cpu,
        };
        self.manager.on_mode_changed(mode);
        self.message = format!("Mode: {mode}");
    }

    fn new_game(&mut self) {
        self.manager.on_reset_requested();
        self.clear_selection();
        self.cursor = (4, 1);
        self.message = format!("New game ({} mode)", self.manager.session().mode());
    }

    fn draw_board(&self) -> io::Result<()> {
        let mut stdout = io::stdout();
        stdout.execute(Clear(ClearType::All))?;
        stdout.execute(MoveTo(0, 0))?;

        println!("Arbiter (vim keys: hjkl)\r");
        println!("Commands: Enter=select/move, m=mode, n=new, q=quit\r");
        println!("\r");

        println!("  a b c d e f g h  \r");
        println!(" ┌─────────────────┐\r");

        let position = self.manager.session().position();
        for rank in ranks_top_down() {
            print!("{}│ ", rank.to_char());

            for square in rank_squares(rank) {
                let is_cursor = self.cursor == (square.file().index(), rank.index());
                let is_selected = self.selected == Some(square);
                let is_target = self.targets.iter().any(|m| m.to == square);

                let background = if is_cursor {
                    TermColor::Yellow
                } else if is_selected {
                    TermColor::Green
                } else if is_target {
                    TermColor::Blue
                } else if (square.file().index() + rank.index()) % 2 == 0 {
                    TermColor::DarkGrey
                } else {
                    TermColor::Black
                };
                stdout.execute(SetBackgroundColor(background))?;

                match position.piece_at(square) {
                    Some(piece) => {
                        let foreground = match piece.color {
                            Color::White => TermColor::White,
                            Color::Black => TermColor::Magenta,
                        };
                        stdout.execute(SetForegroundColor(foreground))?;
                        print!("{} ", piece_symbol(piece));
                    }
                    None => print!("  "),
                }

                stdout.execute(ResetColor)?;
            }

            println!("│{}\r", rank.to_char());
        }

        println!(" └─────────────────┘\r");
        println!("  a b c d e f g h  \r");
        println!("\r");

        for line in status_lines(&self.manager.snapshot()) {
            println!("{line}\r");
        }
        println!("\r");
        println!("{}\r", self.message);

        stdout.flush()?;
        Ok(())
    }
}
