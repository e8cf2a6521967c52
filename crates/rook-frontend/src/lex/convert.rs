use rook_common::ir::RegClass;

pub fn parse_dec(text: &str) -> i64 {
    let (neg, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };

    let mut res: i64 = 0;

    for c in digits.chars() {
        match c {
            '0'..='9' => {
                res = res.wrapping_mul(10);
                res = res.wrapping_add(c.to_digit(10).unwrap() as i64);
            }
            _ => unreachable!(),
        }
    }

    if neg {
        res.wrapping_neg()
    } else {
        res
    }
}

pub fn parse_float(text: &str) -> f64 {
    // The token regex only admits shapes `parse` accepts.
    text.parse().unwrap()
}

/// Split a register token like `$I12` or `N3` into its class and index.
pub fn parse_reg(text: &str) -> (RegClass, u32) {
    let text = text.strip_prefix('$').unwrap_or(text);
    let mut chars = text.chars();

    let class = chars
        .next()
        .and_then(RegClass::from_prefix)
        .unwrap_or_else(|| unreachable!());

    let index = chars.as_str().parse().unwrap_or(u32::MAX);

    (class, index)
}

/// Process the escapes in a string literal, quotes included.
pub fn unescape(text: &str) -> String {
    let inner = &text[1..text.len() - 1];
    let mut res = String::with_capacity(inner.len());
    let mut chars = inner.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            res.push(c);
            continue;
        }

        match chars.next() {
            Some('n') => res.push('\n'),
            Some('t') => res.push('\t'),
            Some('\\') => res.push('\\'),
            Some('"') => res.push('"'),
            Some(other) => res.push(other),
            None => break,
        }
    }

    res
}
