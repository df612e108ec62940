use cacao_path_rust::core::{
    board::BoardSpecification,
    cell::CellIndex,
    dice::DieFace,
    effect::TileKind,
    game_session::GameSession,
    player::PlayerId,
    turn::TurnOutcome,
};
use crossterm::style::Stylize;
use std::io::{self, Write};

pub struct Session {
    board_name: String,
    board_name_old: String,
    board_size: Option<(u32, u32)>,
    num_players: Option<usize>,
    seed: Option<u64>,
    game: Option<GameSession>,
    should_quit: bool,
}

impl Session {
    pub fn new(board_name: String, seed: Option<u64>) -> Self {
        Self {
            board_name,
            board_name_old: String::new(),
            board_size: None,
            num_players: None,
            seed,
            game: None,
            should_quit: false,
        }
    }

    pub fn start(&mut self) {
        self.new_game();
        self.interpretation_loop();
    }

    fn interpretation_loop(&mut self) {
        let stdin = io::stdin();

        loop {
            let prompt = self.user_prompt_text();
            print!("{prompt}");
            let _ = io::stdout().flush();

            let mut line = String::new();
            match stdin.read_line(&mut line) {
                Ok(0) => return,
                Ok(_) => {
                    let line = line.trim_end_matches(['\r', '\n']).to_string();
                    for subline in line.split(';') {
                        self.interpret_directive(subline);
                        if self.should_quit {
                            return;
                        }
                    }
                }
                Err(_) => return,
            }
        }
    }

    fn without_comments(&self, directive: &str) -> String {
        let mut working = directive.to_string();
        while let Some(start_idx) = working.find('(') {
            if let Some(end_rel) = working[start_idx..].find(')') {
                let end_idx = start_idx + end_rel;
                working.replace_range(start_idx..=end_idx, "");
            } else {
                working.truncate(start_idx);
                break;
            }
        }
        working
    }

    fn interpret_directive(&mut self, directive: &str) {
        const TAG_QUIT: &str = "q";
        const TAG_DISPLAY: &str = "d";
        const TAG_HISTORY: &str = "h";
        const TAG_ROLL: &str = "r";
        const TAG_ROLL_LONG: &str = "roll";
        const TAG_NEW: &str = "n";
        const TAG_NEW_LONG: &str = "new";
        const TAG_RESET: &str = "reset";
        const TAG_REPEAT: &str = "x";
        const TAG_BOARD: &str = "b";
        const TAG_BOARD_LONG: &str = "board";
        const TAG_SIZE: &str = "size";
        const TAG_PLAYERS: &str = "p";
        const TAG_PLAYERS_LONG: &str = "numplayers";
        const TAG_SEED: &str = "seed";
        const TAG_SET_VALUE: &str = "sv";
        const TAG_SET_VALUE_LONG: &str = "setvalue";

        let directive = self.without_comments(directive);
        let tokens = directive
            .split_whitespace()
            .map(|token| token.to_string())
            .collect::<Vec<_>>();
        let Some(directive_tag) = tokens.first().map(|token| token.to_lowercase()) else {
            return;
        };

        if directive_tag == TAG_QUIT {
            self.should_quit = true;
        } else if directive_tag == TAG_DISPLAY {
            self.print_game_settings();
            if let Some(game) = self.game.as_ref() {
                println!("{}", game.summary(1));
            }
        } else if directive_tag == TAG_HISTORY {
            if let Some(game) = self.game.as_ref() {
                for outcome in game.turn_hist() {
                    println!("  {outcome}");
                }
            }
        } else if directive_tag == TAG_ROLL || directive_tag == TAG_ROLL_LONG {
            self.roll(None);
        } else if directive_tag == TAG_NEW || directive_tag == TAG_NEW_LONG {
            println!("(NEW BOARD)");
            self.new_game();
        } else if directive_tag == TAG_RESET {
            println!("(RESET)");
            if let Some(game) = self.game.as_mut() {
                game.reset();
                println!("{}", game.summary(1));
            }
        } else if directive_tag == TAG_REPEAT {
            match tokens.get(1).map(|token| token.parse::<usize>()) {
                Some(Ok(num_repeats)) if tokens.len() > 2 => {
                    let directive_text = tokens[2..].join(" ");
                    println!("(REPEAT {num_repeats}: {directive_text})");
                    for _ in 0..num_repeats {
                        self.interpret_directive(&directive_text);
                        if self.should_quit {
                            return;
                        }
                    }
                }
                _ => println!("  directive {directive_tag} needs repetition count and directive to repeat"),
            }
        } else if directive_tag == TAG_BOARD || directive_tag == TAG_BOARD_LONG {
            if tokens.len() != 2 {
                println!("  board directive needs two tokens");
            } else {
                self.board_name = tokens[1].clone();
                if !self.board_name.to_lowercase().starts_with("cacao") {
                    self.board_name = format!("Cacao{}", self.board_name);
                }
            }

            self.print_game_settings();
        } else if directive_tag == TAG_SIZE {
            let dims = tokens
                .iter()
                .skip(1)
                .map(|token| token.parse::<u32>())
                .collect::<Result<Vec<_>, _>>();
            match dims.as_deref() {
                Ok([width, height]) => self.board_size = Some((*width, *height)),
                Ok([]) => self.board_size = None,
                _ => println!("  {TAG_SIZE} directive needs two integer tokens (or none to use the board's own size)"),
            }

            self.print_game_settings();
        } else if directive_tag == TAG_PLAYERS || directive_tag == TAG_PLAYERS_LONG {
            match tokens.get(1).map(|token| token.parse::<usize>()) {
                Some(Ok(new_val)) if tokens.len() == 2 => self.num_players = Some(new_val),
                _ => println!("  {TAG_PLAYERS_LONG} directive needs one integer token"),
            }

            self.print_game_settings();
        } else if directive_tag == TAG_SEED {
            match tokens.get(1).map(|token| token.parse::<u64>()) {
                Some(Ok(seed)) => self.seed = Some(seed),
                None => self.seed = None,
                Some(Err(_)) => println!("  {TAG_SEED} directive needs one unsigned integer token"),
            }

            self.print_game_settings();
        } else if directive_tag == TAG_SET_VALUE || directive_tag == TAG_SET_VALUE_LONG {
            self.handle_set_value(&tokens);
        } else if let Ok(face) = directive_tag.parse::<u8>() {
            match DieFace::new(face) {
                Ok(face) => self.roll(Some(face)),
                Err(err) => println!("  {err}"),
            }
        } else {
            let mut explanations = vec![
                "b/board [boardName] | set board (prefixes Cacao if missing)",
                "d       | display game state",
                "h       | display turn history",
                "n/new   | new game with freshly placed special tiles",
                "numplayers/p [int] | set number of players",
                "q       | quit",
                "r/roll  | roll the die for the current player",
                "reset   | send everyone back to start, same board",
                "seed [u64] | set rng seed for the next new game (none for random)",
                "size [width] [height] | override board size",
                "sv/setvalue playerNum attributeName attributeValue | set pos/skip/extra/turn",
                "x [n] [cmd] | repeat [cmd] n times",
                "[1-6]   | roll, forcing the die to that face",
            ];
            explanations.sort();
            println!("  unrecognized directive '{directive}'");
            for explanation in explanations {
                println!("  {explanation}");
            }
        }
    }

    fn print_game_settings(&self) {
        println!("  Board(b):       {}", self.board_name);
        match self.board_size {
            Some((width, height)) => println!("  Size:           {width}x{height}"),
            None => println!("  Size:           (board default)"),
        }
        match self.num_players {
            Some(num_players) => println!("  NumPlayers(p):  {num_players}"),
            None => println!("  NumPlayers(p):  (board default)"),
        }
        match self.seed {
            Some(seed) => println!("  Seed:           {seed}"),
            None => println!("  Seed:           (random)"),
        }
    }

    fn roll(&mut self, forced_face: Option<DieFace>) {
        let Some(game) = self.game.as_mut() else {
            println!("  game not initialized");
            return;
        };

        let pending = match game.roll_dice() {
            Ok(pending) => pending,
            Err(err) => {
                println!("  {err}");
                return;
            }
        };

        let face = forced_face.unwrap_or(pending.face);
        match game.settle(pending.token, face) {
            Ok(outcome) => Self::print_outcome(&outcome),
            Err(err) => println!("  {err}"),
        }
    }

    fn print_outcome(outcome: &TurnOutcome) {
        println!("  You rolled a {}!", outcome.face);
        println!("  {outcome}");
        if let Some(special) = &outcome.special {
            let text = match special.kind {
                TileKind::Benefit => special.text.as_str().green(),
                TileKind::Penalty => special.text.as_str().red(),
            };
            println!("  {text}");
        }
    }

    fn handle_set_value(&mut self, tokens: &[String]) {
        const USAGE: &str = "  setvalue directive needs following tokens: playerNum attributeName attributeValue";

        let Some(game) = self.game.as_mut() else {
            return;
        };

        if tokens.len() <= 3 {
            println!("{USAGE}");
            return;
        }

        let Some(player_id) = tokens[1]
            .parse::<usize>()
            .ok()
            .and_then(PlayerId::from_display_num)
        else {
            println!("{USAGE}");
            return;
        };

        let attribute_name = tokens[2].to_lowercase();
        let attribute_value = tokens[3].as_str();

        let result = match attribute_name.as_str() {
            "pos" | "position" => match attribute_value.parse::<usize>() {
                Ok(cell) => game.set_player_position(player_id, CellIndex(cell)),
                Err(_) => {
                    println!("{USAGE}");
                    return;
                }
            },
            "skip" | "extra" => match attribute_value.parse::<bool>() {
                Ok(pending) if attribute_name == "skip" => game.set_pending_skip(player_id, pending),
                Ok(pending) => game.set_pending_extra_turn(player_id, pending),
                Err(_) => {
                    println!("{USAGE}");
                    return;
                }
            },
            "turn" => game.set_current_player(player_id),
            _ => {
                println!("{USAGE}");
                return;
            }
        };

        match result {
            Ok(()) => println!("{}", game.summary(1)),
            Err(err) => println!("  {err}"),
        }
    }

    fn new_game_with_problems(&mut self) -> Result<(), Vec<String>> {
        let mut spec = BoardSpecification::from_embedded(&self.board_name).map_err(|err| vec![err.to_string()])?;
        if let Some((width, height)) = self.board_size {
            spec = spec.with_dimensions(width, height);
        }
        if let Some(num_players) = self.num_players {
            spec = spec.with_num_players(num_players);
        }

        let game = GameSession::from_spec(spec, self.seed).map_err(|err| vec![err.to_string()])?;
        game.board().is_valid()?;

        self.game = Some(game);
        self.board_name_old = self.board_name.clone();
        Ok(())
    }

    fn new_game(&mut self) -> bool {
        match self.new_game_with_problems() {
            Ok(()) => {
                self.print_game_settings();
                if let Some(game) = self.game.as_ref() {
                    println!("{}", game.summary(1));
                }
                true
            }
            Err(problems) => {
                println!("problems starting game");
                for problem in problems {
                    println!("  {problem}");
                }
                if !self.board_name_old.is_empty() {
                    println!("  keeping previous game on {}", self.board_name_old);
                }
                false
            }
        }
    }

    fn user_prompt_text(&self) -> String {
        match self.game.as_ref() {
            Some(game) => format!("{}> ", game.current_player_id()),
            None => "> ".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn started_session() -> Session {
        let mut session = Session::new("CacaoTiny".to_string(), Some(5));
        assert!(session.new_game());
        session
    }

    #[test]
    fn without_comments_strips_parenthesized_text() {
        let session = Session::new("CacaoTiny".to_string(), None);
        assert_eq!(session.without_comments("r (first roll) x"), "r  x");
        assert_eq!(session.without_comments("d (unterminated"), "d ");
    }

    #[test]
    fn digit_directive_forces_the_face() {
        let mut session = started_session();
        session.interpret_directive("3");

        let game = session.game.as_ref().unwrap();
        let outcome = game.last_turn().unwrap();
        assert_eq!(outcome.face.value(), 3);
        assert_eq!(outcome.landed_cell, CellIndex(3));
    }

    #[test]
    fn repeat_directive_rolls_several_times() {
        let mut session = started_session();
        session.interpret_directive("x 4 roll");
        assert_eq!(session.game.as_ref().unwrap().turn_hist().len(), 4);
    }

    #[test]
    fn setvalue_moves_player_and_sets_turn() {
        let mut session = started_session();
        session.interpret_directive("sv 2 pos 5");
        session.interpret_directive("sv 2 turn x");

        let game = session.game.as_ref().unwrap();
        assert_eq!(game.players()[1].position, CellIndex(5));
        assert_eq!(game.current_player_id(), PlayerId(1));
    }

    #[test]
    fn bad_size_keeps_previous_game() {
        let mut session = started_session();
        session.interpret_directive("size 1 1");
        assert!(!session.new_game());
        assert_eq!(session.game.as_ref().unwrap().board().width, 3);

        session.interpret_directive("size 5 4");
        session.interpret_directive("p 4");
        assert!(session.new_game());
        let game = session.game.as_ref().unwrap();
        assert_eq!(game.board().len(), 14);
        assert_eq!(game.players().len(), 4);
    }
}
