use teebox_core::tally::{Lead, Tally};

/// Conventional match play summary, e.g. "ALL SQUARE, 6 to play" or
/// "Dana wins 4&2".
pub fn status_text(tally: &Tally, lead: &Lead<String>) -> String {
    let remaining = tally.holes_remaining();
    match (tally.is_complete(), lead) {
        (false, Lead::AllSquare) => format!("ALL SQUARE, {remaining} to play"),
        (false, Lead::Leading { leader, margin }) => {
            format!("{leader}, {margin} UP, {remaining} to play")
        },
        (true, Lead::AllSquare) => "Match halved".to_string(),
        (true, Lead::Leading { leader, margin }) if remaining == 0 => {
            format!("{leader} wins {margin} UP")
        },
        (true, Lead::Leading { leader, margin }) => format!("{leader} wins {margin}&{remaining}"),
    }
}
