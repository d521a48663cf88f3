use console::Style;
use itertools::Itertools;

use chess_relay::event::{ChessServerEvent, Occupancy};
use chess_relay::rules::{DrawCause, TerminalReason};
use chess_relay::side::Side;


fn piece_to_pictogram(ch: char) -> Option<char> {
    Some(match ch {
        'P' => '♙',
        'N' => '♘',
        'B' => '♗',
        'R' => '♖',
        'Q' => '♕',
        'K' => '♔',
        'p' => '♟',
        'n' => '♞',
        'b' => '♝',
        'r' => '♜',
        'q' => '♛',
        'k' => '♚',
        _ => return None,
    })
}

fn format_square(ch: char) -> String { format!(" {} ", ch) }

// Parses the piece placement field of a FEN. Rank 8 comes first.
fn parse_placement(fen: &str) -> Result<Vec<Vec<Option<char>>>, String> {
    let placement = fen.split_whitespace().next().ok_or_else(|| "Empty FEN".to_owned())?;
    let ranks = placement
        .split('/')
        .map(|rank| {
            let mut row = Vec::new();
            for ch in rank.chars() {
                if let Some(skip) = ch.to_digit(10) {
                    row.extend(std::iter::repeat_n(None, skip as usize));
                } else {
                    let piece = piece_to_pictogram(ch)
                        .ok_or_else(|| format!("Unexpected piece '{ch}' in FEN"))?;
                    row.push(Some(piece));
                }
            }
            if row.len() != 8 {
                return Err(format!("Rank '{rank}' does not have 8 squares"));
            }
            Ok(row)
        })
        .collect::<Result<Vec<_>, _>>()?;
    if ranks.len() != 8 {
        return Err(format!("Expected 8 ranks, got {}", ranks.len()));
    }
    Ok(ranks)
}

// Renders the board from the point of view of `perspective`: their pieces at the bottom.
pub fn render_board(fen: &str, perspective: Side) -> Result<String, String> {
    let colors = [
        Style::new().color256(233).on_color256(222),
        Style::new().color256(233).on_color256(230),
    ];
    let ranks = parse_placement(fen)?;
    let flip = perspective == Side::Black;
    let files = if flip { "hgfedcba" } else { "abcdefgh" };
    let header = format!("   {}   \n", files.chars().map(format_square).join(""));

    let mut ret = header.clone();
    for display_row in 0..8 {
        let rank_idx = if flip { 7 - display_row } else { display_row };
        let rank_label = char::from(b'8' - rank_idx as u8);
        ret.push_str(&format_square(rank_label));
        for display_col in 0..8 {
            let file_idx = if flip { 7 - display_col } else { display_col };
            // a8 is a light square.
            let color_idx = (rank_idx + file_idx + 1) % 2;
            let square = format_square(ranks[rank_idx][file_idx].unwrap_or(' '));
            ret.push_str(&colors[color_idx].apply_to(square).to_string());
        }
        ret.push_str(&format_square(rank_label));
        ret.push('\n');
    }
    ret.push_str(&header);
    Ok(ret)
}

fn render_occupancy(occupancy: Occupancy) -> String {
    let seat = |occupied: bool| if occupied { "taken" } else { "free" };
    format!("White: {}, Black: {}", seat(occupancy.white), seat(occupancy.black))
}

fn render_terminal(reason: TerminalReason) -> String {
    match reason {
        TerminalReason::Checkmate { winner } => format!("Checkmate! {winner} wins."),
        TerminalReason::Draw { cause } => {
            let cause = match cause {
                DrawCause::Stalemate => "stalemate",
                DrawCause::ThreefoldRepetition => "threefold repetition",
                DrawCause::InsufficientMaterial => "insufficient material",
                DrawCause::FiftyMoveRule => "fifty-move rule",
            };
            format!("Draw by {cause}.")
        }
    }
}

// One line per event, except for positions which are rendered as a board.
pub fn render_event(event: &ChessServerEvent, perspective: Side) -> String {
    use ChessServerEvent::*;
    match event {
        PlayerRole { side } => format!("You play {side}."),
        SpectatorRole => "Both seats are taken, you are watching.".to_owned(),
        GameState { position } => render_board(position, perspective)
            .unwrap_or_else(|err| format!("Cannot render position '{position}': {err}")),
        PlayersUpdate(occupancy) => render_occupancy(*occupancy),
        Turn { side } => format!("{side} to move."),
        Move(mv) => format!("Move: {mv}"),
        InvalidMove(mv) => Style::new().red().apply_to(format!("Move rejected: {mv}")).to_string(),
        GameOver(reason) => Style::new().magenta().apply_to(render_terminal(*reason)).to_string(),
        GameReset => "Game reset.".to_owned(),
        Error { message } => Style::new().red().apply_to(format!("Error: {message}")).to_string(),
    }
}


#[cfg(test)]
mod tests {
    use chess_relay::rules::MoveRequest;
    use pretty_assertions::assert_eq;

    use super::*;

    const INITIAL_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    fn plain(s: String) -> String { console::strip_ansi_codes(&s).into_owned() }

    #[test]
    fn board_from_white_side() {
        let board = plain(render_board(INITIAL_FEN, Side::White).unwrap());
        let lines = board.lines().collect_vec();
        assert_eq!(lines.len(), 10);
        assert_eq!(lines[0].trim(), "a  b  c  d  e  f  g  h");
        assert_eq!(lines[1], " 8  ♜  ♞  ♝  ♛  ♚  ♝  ♞  ♜  8 ");
        assert_eq!(lines[8], " 1  ♖  ♘  ♗  ♕  ♔  ♗  ♘  ♖  1 ");
    }

    #[test]
    fn board_from_black_side() {
        let board = plain(render_board(INITIAL_FEN, Side::Black).unwrap());
        let lines = board.lines().collect_vec();
        assert_eq!(lines[0].trim(), "h  g  f  e  d  c  b  a");
        assert_eq!(lines[1], " 1  ♖  ♘  ♗  ♔  ♕  ♗  ♘  ♖  1 ");
    }

    #[test]
    fn malformed_fen() {
        assert!(render_board("", Side::White).is_err());
        assert!(render_board("8/8/8 w - - 0 1", Side::White).is_err());
        assert!(render_board("rnbqkbnr/ppppxppp/8/8/8/8/PPPPPPPP/RNBQKBNR w", Side::White).is_err());
    }

    #[test]
    fn event_lines() {
        assert_eq!(
            plain(render_event(&ChessServerEvent::Move(MoveRequest::new("e2", "e4", None)), Side::White)),
            "Move: e2e4"
        );
        assert_eq!(
            plain(render_event(
                &ChessServerEvent::GameOver(TerminalReason::Draw { cause: DrawCause::Stalemate }),
                Side::White
            )),
            "Draw by stalemate."
        );
        assert_eq!(
            plain(render_event(
                &ChessServerEvent::PlayersUpdate(Occupancy { white: true, black: false }),
                Side::White
            )),
            "White: taken, Black: free"
        );
    }
}
