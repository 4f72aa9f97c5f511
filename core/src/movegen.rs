use crate::position::{Position, DIAGONALS, KING_DELTAS, KNIGHT_DELTAS, STRAIGHTS};
use crate::types::{Color, File, Move, PieceType, Square};

/// Generates all legal moves for the side to move.
pub fn generate_legal_moves(position: &Position) -> Vec<Move> {
    let mover = position.side_to_move();
    generate_pseudo_legal_moves(position)
        .into_iter()
        .filter(|&mv| !position.play_unchecked(mv).0.is_side_in_check(mover))
        .collect()
}

/// Generates moves that obey piece movement but may leave the king in check.
fn generate_pseudo_legal_moves(position: &Position) -> Vec<Move> {
    let mut moves = Vec::with_capacity(48);
    let color = position.side_to_move();

    for (from, piece) in position.board().pieces_of(color) {
        match piece.piece_type {
            PieceType::Pawn => generate_pawn_moves(position, from, color, &mut moves),
            PieceType::Knight => {
                generate_step_moves(position, from, color, &KNIGHT_DELTAS, &mut moves)
            }
            PieceType::Bishop => {
                generate_sliding_moves(position, from, color, &DIAGONALS, &mut moves)
            }
            PieceType::Rook => {
                generate_sliding_moves(position, from, color, &STRAIGHTS, &mut moves)
            }
            PieceType::Queen => {
                generate_sliding_moves(position, from, color, &DIAGONALS, &mut moves);
                generate_sliding_moves(position, from, color, &STRAIGHTS, &mut moves);
            }
            PieceType::King => {
                generate_step_moves(position, from, color, &KING_DELTAS, &mut moves);
                generate_castling_moves(position, from, color, &mut moves);
            }
        }
    }

    moves
}

/// Pushes a pawn move, expanding it into all four promotions on the last rank.
fn push_pawn_move(from: Square, to: Square, color: Color, moves: &mut Vec<Move>) {
    if to.rank() == color.promotion_rank() {
        moves.extend(
            PieceType::PROMOTIONS
                .iter()
                .map(|&promotion| Move::new_promotion(from, to, promotion)),
        );
    } else {
        moves.push(Move::new(from, to));
    }
}

fn generate_pawn_moves(position: &Position, from: Square, color: Color, moves: &mut Vec<Move>) {
    let board = position.board();
    let direction = color.pawn_direction();

    if let Some(one) = from.offset(0, direction) {
        if board.is_empty(one) {
            push_pawn_move(from, one, color, moves);

            if from.rank() == color.pawn_rank() {
                if let Some(two) = one.offset(0, direction) {
                    if board.is_empty(two) {
                        moves.push(Move::new(from, two));
                    }
                }
            }
        }
    }

    for df in [-1, 1] {
        let Some(target) = from.offset(df, direction) else {
            continue;
        };
        if board.is_enemy(target, color) {
            push_pawn_move(from, target, color, moves);
        } else if position.en_passant() == Some(target) {
            moves.push(Move::new(from, target));
        }
    }
}

/// Knight and king moves: a single step per delta.
fn generate_step_moves(
    position: &Position,
    from: Square,
    color: Color,
    deltas: &[(i8, i8)],
    moves: &mut Vec<Move>,
) {
    for &(df, dr) in deltas {
        if let Some(to) = from.offset(df, dr) {
            if !position.board().is_color(to, color) {
                moves.push(Move::new(from, to));
            }
        }
    }
}

fn generate_sliding_moves(
    position: &Position,
    from: Square,
    color: Color,
    directions: &[(i8, i8)],
    moves: &mut Vec<Move>,
) {
    let board = position.board();
    for &(df, dr) in directions {
        let mut current = from;
        while let Some(to) = current.offset(df, dr) {
            if board.is_empty(to) {
                moves.push(Move::new(from, to));
            } else {
                if board.is_enemy(to, color) {
                    moves.push(Move::new(from, to));
                }
                break;
            }
            current = to;
        }
    }
}

fn generate_castling_moves(position: &Position, king: Square, color: Color, moves: &mut Vec<Move>) {
    let rights = position.castling().get(color);
    let back_rank = color.back_rank();
    let enemy = color.opponent();

    if !rights.any() || king != Square::new(File::E, back_rank) {
        return;
    }
    if position.is_attacked_by(king, enemy) {
        return;
    }

    let board = position.board();
    let at = |file: File| Square::new(file, back_rank);
    let rook_home = |file: File| {
        board.piece_at(at(file)).is_some_and(|p| {
            p.color == color && p.piece_type == PieceType::Rook
        })
    };

    if rights.kingside && rook_home(File::H) {
        let (f, g) = (at(File::F), at(File::G));
        if board.is_empty(f)
            && board.is_empty(g)
            && !position.is_attacked_by(f, enemy)
            && !position.is_attacked_by(g, enemy)
        {
            moves.push(Move::new(king, g));
        }
    }

    if rights.queenside && rook_home(File::A) {
        let (d, c) = (at(File::D), at(File::C));
        let b = at(File::B);
        if board.is_empty(d)
            && board.is_empty(c)
            && board.is_empty(b)
            && !position.is_attacked_by(d, enemy)
            && !position.is_attacked_by(c, enemy)
        {
            moves.push(Move::new(king, c));
        }
    }
}

/// The side to move is in check and has no legal reply.
pub fn is_checkmate(position: &Position) -> bool {
    position.is_in_check() && generate_legal_moves(position).is_empty()
}

/// The side to move is not in check but has no legal move.
pub fn is_stalemate(position: &Position) -> bool {
    !position.is_in_check() && generate_legal_moves(position).is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fen::positions;

    fn sq(name: &str) -> Square {
        name.parse().unwrap()
    }

    #[test]
    fn test_starting_position_moves() {
        let moves = generate_legal_moves(&Position::new());
        assert_eq!(moves.len(), 20);
    }

    #[test]
    fn test_kiwipete_moves() {
        let position = Position::from_fen(positions::KIWIPETE).unwrap();
        assert_eq!(generate_legal_moves(&position).len(), 48);
    }

    #[test]
    fn test_pawn_promotion() {
        let position = Position::from_fen("7k/P7/8/8/8/8/8/K7 w - - 0 1").unwrap();
        let moves = generate_legal_moves(&position);

        let pawn_moves: Vec<_> = moves.iter().filter(|m| m.from == sq("a7")).collect();
        assert_eq!(pawn_moves.len(), 4);
        assert!(pawn_moves.iter().all(|m| m.promotion.is_some()));
    }

    #[test]
    fn test_pinned_piece_cannot_move() {
        // the e2 knight is pinned against the king by the e8 rook
        let position = Position::from_fen("4r2k/8/8/8/8/8/4N3/4K3 w - - 0 1").unwrap();
        let moves = generate_legal_moves(&position);
        assert!(moves.iter().all(|m| m.from != sq("e2")));
    }

    #[test]
    fn test_no_castling_through_check() {
        // the f8 rook covers f1
        let position = Position::from_fen("k4r2/8/8/8/8/8/8/4K2R w K - 0 1").unwrap();
        let moves = generate_legal_moves(&position);
        assert!(!moves.contains(&Move::new(sq("e1"), sq("g1"))));
    }

    #[test]
    fn test_castling_available() {
        let position = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let moves = generate_legal_moves(&position);
        assert!(moves.contains(&Move::new(sq("e1"), sq("g1"))));
        assert!(moves.contains(&Move::new(sq("e1"), sq("c1"))));
    }

    #[test]
    fn test_en_passant_generated() {
        let position = Position::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1").unwrap();
        let moves = generate_legal_moves(&position);
        assert!(moves.contains(&Move::new(sq("e5"), sq("d6"))));
    }

    #[test]
    fn test_checkmate_and_stalemate() {
        // fool's mate
        let mated =
            Position::from_fen("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3")
                .unwrap();
        assert!(is_checkmate(&mated));
        assert!(!is_stalemate(&mated));

        let stalemate = Position::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        assert!(is_stalemate(&stalemate));
        assert!(!is_checkmate(&stalemate));
    }
}
