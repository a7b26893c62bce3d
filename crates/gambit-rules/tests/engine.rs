//! Whole-game scenarios driven through the public engine API.

use gambit_rules::{Board, ChessMove, Color, Game, Position, RulesError, Standing};

fn mv(text: &str) -> ChessMove {
    text.parse().unwrap()
}

fn play(game: &mut Game, moves: &[&str]) {
    for text in moves {
        game.make_move(mv(text))
            .unwrap_or_else(|e| panic!("{text} rejected: {e}"));
    }
}

fn count_moves(game: &Game, color: Color) -> usize {
    game.board()
        .pieces()
        .filter(|(_, piece)| piece.color == color)
        .map(|(pos, _)| game.valid_moves(pos).unwrap_or_default().len())
        .sum()
}

#[test]
fn test_opening_white_has_twenty_moves_black_none() {
    let game = Game::new();
    assert_eq!(count_moves(&game, Color::White), 20);
    assert_eq!(count_moves(&game, Color::Black), 0);
}

#[test]
fn test_opening_black_has_twenty_moves_after_white() {
    let mut game = Game::new();
    play(&mut game, &["e2e4"]);
    assert_eq!(count_moves(&game, Color::White), 0);
    assert_eq!(count_moves(&game, Color::Black), 20);
}

#[test]
fn test_fools_mate_finishes_game() {
    let mut game = Game::new();
    play(&mut game, &["f2f3", "e7e5", "g2g4", "d8h4"]);

    assert_eq!(game.is_in_check(Color::White), Ok(true));
    assert_eq!(game.evaluate(Color::White), Ok(Standing::Checkmate));
    assert!(game.is_finished());
    assert_eq!(game.make_move(mv("a2a3")), Err(RulesError::GameOver));
}

#[test]
fn test_checkmate_implies_check_and_no_moves() {
    let mut game = Game::new();
    play(&mut game, &["f2f3", "e7e5", "g2g4", "d8h4"]);

    let moves_before = count_moves(&game, Color::White);
    assert!(game.is_in_checkmate(Color::White).unwrap());
    assert!(game.is_in_check(Color::White).unwrap());
    assert_eq!(moves_before, 0);
    // Checkmate and stalemate exclude each other.
    assert!(!game.is_in_stalemate(Color::White).unwrap());
}

#[test]
fn test_stalemate_implies_no_check_and_no_moves() {
    let board: Board = "
        .......k
        .....Q..
        ......K.
        ........
        ........
        ........
        ........
        ........
    "
    .parse()
    .unwrap();
    let mut game = Game::from_board(board, Color::Black).unwrap();

    assert_eq!(count_moves(&game, Color::Black), 0);
    assert_eq!(game.is_in_check(Color::Black), Ok(false));
    assert_eq!(game.evaluate(Color::Black), Ok(Standing::Stalemate));
    assert!(game.is_finished());
}

#[test]
fn test_repeated_move_fails_second_time() {
    let mut game = Game::new();
    play(&mut game, &["e2e4", "e7e5"]);
    assert!(game.make_move(mv("e2e4")).is_err());
}

#[test]
fn test_capture_removes_one_piece() {
    let mut game = Game::new();
    play(&mut game, &["e2e4", "d7d5"]);
    assert_eq!(game.board().occupied_count(), 32);

    play(&mut game, &["e4d5"]);
    assert_eq!(game.board().occupied_count(), 31);
    assert_eq!(
        game.board().get(Position::new(5, 4)).map(|p| p.color),
        Some(Color::White)
    );
}

#[test]
fn test_move_then_inverse_restores_board() {
    let mut game = Game::new();
    play(&mut game, &["g1f3", "g8f6", "f3g1", "f6g8"]);
    assert_eq!(game.board(), &Board::standard());
    assert_eq!(game.turn(), Color::White);
}

#[test]
fn test_promotion_offers_four_pieces() {
    let board: Board = "
        ....k...
        .P......
        ........
        ........
        ........
        ........
        ........
        ....K...
    "
    .parse()
    .unwrap();
    let mut game = Game::from_board(board, Color::White).unwrap();

    let moves = game.valid_moves(Position::new(7, 2)).unwrap();
    assert_eq!(moves.len(), 4);

    play(&mut game, &["b7b8q"]);
    // The new queen gives check along the back rank.
    assert_eq!(game.evaluate(Color::Black), Ok(Standing::Check));
}

#[test]
fn test_escaping_check_is_required() {
    let mut game = Game::new();
    play(&mut game, &["e2e4", "f7f6", "d1h5"]);
    assert_eq!(game.is_in_check(Color::Black), Ok(true));

    // Anything that leaves the king attacked is rejected.
    assert!(game.make_move(mv("a7a6")).is_err());
    play(&mut game, &["g7g6"]);
    assert_eq!(game.is_in_check(Color::Black), Ok(false));
}

#[test]
fn test_game_json_round_trip_mid_game() {
    let mut game = Game::new();
    play(&mut game, &["e2e4", "c7c5", "g1f3"]);

    let json = serde_json::to_string(&game).unwrap();
    let back: Game = serde_json::from_str(&json).unwrap();
    assert_eq!(back, game);
    assert_eq!(back.turn(), Color::Black);
}
