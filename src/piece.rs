use serde::{Deserialize, Serialize};


// Serialized as the single lowercase letter used in UCI and in the web client,
// e.g. the promotion piece in `{"from": "e7", "to": "e8", "promotion": "q"}`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum PieceKind {
    #[serde(rename = "p")]
    Pawn,
    #[serde(rename = "n")]
    Knight,
    #[serde(rename = "b")]
    Bishop,
    #[serde(rename = "r")]
    Rook,
    #[serde(rename = "q")]
    Queen,
    #[serde(rename = "k")]
    King,
}

impl PieceKind {
    pub fn from_algebraic(ch: char) -> Option<Self> {
        match ch.to_ascii_lowercase() {
            'p' => Some(PieceKind::Pawn),
            'n' => Some(PieceKind::Knight),
            'b' => Some(PieceKind::Bishop),
            'r' => Some(PieceKind::Rook),
            'q' => Some(PieceKind::Queen),
            'k' => Some(PieceKind::King),
            _ => None,
        }
    }

    pub fn to_algebraic(self) -> char {
        match self {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        }
    }
}

impl From<PieceKind> for shakmaty::Role {
    fn from(kind: PieceKind) -> Self {
        match kind {
            PieceKind::Pawn => shakmaty::Role::Pawn,
            PieceKind::Knight => shakmaty::Role::Knight,
            PieceKind::Bishop => shakmaty::Role::Bishop,
            PieceKind::Rook => shakmaty::Role::Rook,
            PieceKind::Queen => shakmaty::Role::Queen,
            PieceKind::King => shakmaty::Role::King,
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn algebraic_letters_match_serde_names() {
        use PieceKind::*;
        for kind in [Pawn, Knight, Bishop, Rook, Queen, King] {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.to_algebraic()));
            assert_eq!(PieceKind::from_algebraic(kind.to_algebraic()), Some(kind));
        }
        assert_eq!(PieceKind::from_algebraic('Q'), Some(Queen));
        assert_eq!(PieceKind::from_algebraic('x'), None);
    }
}
