//! Header and label text helpers

/// Rewrite a header to lower_snake_case: whitespace and non-word characters
/// become `_`, repeated underscores collapse.
pub fn normalize_header(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.trim().chars() {
        let mapped = if ch.is_ascii_alphanumeric() || ch == '_' { ch } else { '_' };
        if mapped == '_' && out.ends_with('_') {
            continue;
        }
        out.push(mapped);
    }
    out.to_lowercase()
}

/// Human label for a column name: `passing_yards` → `Passing Yards`
pub fn labelize(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut prev_is_word = false;
    for ch in name.chars() {
        let ch = if ch == '_' { ' ' } else { ch };
        let is_word = ch.is_ascii_alphanumeric();
        if is_word && !prev_is_word {
            out.extend(ch.to_uppercase());
        } else {
            out.push(ch);
        }
        prev_is_word = is_word;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_header() {
        assert_eq!(normalize_header("Season"), "season");
        assert_eq!(normalize_header("  Opponent Team "), "opponent_team");
        assert_eq!(normalize_header("Yds/Att"), "yds_att");
        assert_eq!(normalize_header("a  -  b"), "a_b");
        assert_eq!(normalize_header("already_snake"), "already_snake");
    }

    #[test]
    fn test_labelize() {
        assert_eq!(labelize("passing_yards"), "Passing Yards");
        assert_eq!(labelize("fantasy_points_ppr"), "Fantasy Points Ppr");
        assert_eq!(labelize("3rd_down_att"), "3rd Down Att");
        assert_eq!(labelize(""), "");
    }
}
