//! String format validators.
//!
//! Hand-written matchers, no regex. Each format has a stable name used as the
//! `format` of `invalid_format` issues.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;

/// Options for ISO datetime validation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IsoDatetimeOptions {
    /// Allow `+HH:MM` / `-HH:MM` offsets in addition to `Z`.
    pub offset: bool,
    /// Allow a missing timezone designator.
    pub local: bool,
    /// Exact number of fractional-second digits; `None` allows any.
    pub precision: Option<u8>,
}

/// A named string format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StringFormat {
    Email,
    Url,
    Uuid,
    /// Any 8-4-4-4-12 hex identifier.
    Guid,
    Base64,
    Base64Url,
    Hostname,
    Cuid2,
    Ulid,
    Nanoid,
    Emoji,
    E164,
    Ipv4,
    Ipv6,
    CidrV4,
    CidrV6,
    Mac { delimiter: char },
    Jwt { alg: Option<String> },
    Json,
    Date,
    Time { precision: Option<u8> },
    Datetime(IsoDatetimeOptions),
    Duration,
}

impl StringFormat {
    pub fn name(&self) -> &'static str {
        match self {
            StringFormat::Email => "email",
            StringFormat::Url => "url",
            StringFormat::Uuid => "uuid",
            StringFormat::Guid => "guid",
            StringFormat::Base64 => "base64",
            StringFormat::Base64Url => "base64url",
            StringFormat::Hostname => "hostname",
            StringFormat::Cuid2 => "cuid2",
            StringFormat::Ulid => "ulid",
            StringFormat::Nanoid => "nanoid",
            StringFormat::Emoji => "emoji",
            StringFormat::E164 => "e164",
            StringFormat::Ipv4 => "ipv4",
            StringFormat::Ipv6 => "ipv6",
            StringFormat::CidrV4 => "cidrv4",
            StringFormat::CidrV6 => "cidrv6",
            StringFormat::Mac { .. } => "mac",
            StringFormat::Jwt { .. } => "jwt",
            StringFormat::Json => "json_string",
            StringFormat::Date => "date",
            StringFormat::Time { .. } => "time",
            StringFormat::Datetime(_) => "datetime",
            StringFormat::Duration => "duration",
        }
    }

    pub fn validate(&self, s: &str) -> bool {
        match self {
            StringFormat::Email => is_valid_email(s),
            StringFormat::Url => is_valid_url(s),
            StringFormat::Uuid => is_valid_uuid(s),
            StringFormat::Guid => is_valid_guid(s),
            StringFormat::Base64 => is_valid_base64(s),
            StringFormat::Base64Url => is_valid_base64url(s),
            StringFormat::Hostname => is_valid_hostname(s),
            StringFormat::Cuid2 => is_valid_cuid2(s),
            StringFormat::Ulid => is_valid_ulid(s),
            StringFormat::Nanoid => is_valid_nanoid(s),
            StringFormat::Emoji => is_valid_emoji(s),
            StringFormat::E164 => is_valid_e164(s),
            StringFormat::Ipv4 => is_valid_ipv4(s),
            StringFormat::Ipv6 => is_valid_ipv6(s),
            StringFormat::CidrV4 => is_valid_cidr(s, is_valid_ipv4, 32),
            StringFormat::CidrV6 => is_valid_cidr(s, is_valid_ipv6, 128),
            StringFormat::Mac { delimiter } => is_valid_mac(s, *delimiter),
            StringFormat::Jwt { alg } => is_valid_jwt(s, alg.as_deref()),
            StringFormat::Json => serde_json::from_str::<serde_json::Value>(s).is_ok(),
            StringFormat::Date => is_valid_iso_date(s),
            StringFormat::Time { precision } => is_valid_iso_time(s, *precision),
            StringFormat::Datetime(opts) => is_valid_iso_datetime(s, opts),
            StringFormat::Duration => is_valid_iso_duration(s),
        }
    }
}

fn is_valid_email(s: &str) -> bool {
    // local@domain, basic RFC-like check
    let at = match s.rfind('@') {
        Some(pos) if pos > 0 => pos,
        _ => return false,
    };
    let local = &s[..at];
    let domain = &s[at + 1..];

    if local.starts_with('.') || local.ends_with('.') || local.contains("..") {
        return false;
    }
    let local_ok = local
        .chars()
        .all(|ch| ch.is_ascii_alphanumeric() || "!#$%&'*+/=?^_`{|}~.-".contains(ch));
    local_ok && domain.contains('.') && is_valid_hostname(domain)
}

fn is_valid_url(s: &str) -> bool {
    let Some((scheme, rest)) = s.split_once("://") else {
        return false;
    };
    let scheme_ok = scheme
        .chars()
        .next()
        .map_or(false, |c| c.is_ascii_alphabetic())
        && scheme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "+-.".contains(c));
    if !scheme_ok || rest.is_empty() {
        return false;
    }
    let authority = rest.split(['/', '?', '#']).next().unwrap_or("");
    !authority.is_empty() && !rest.contains(char::is_whitespace)
}

fn hex_groups(s: &str, lens: &[usize]) -> bool {
    let groups: Vec<&str> = s.split('-').collect();
    groups.len() == lens.len()
        && groups
            .iter()
            .zip(lens)
            .all(|(g, &n)| g.len() == n && g.bytes().all(|b| b.is_ascii_hexdigit()))
}

fn is_valid_guid(s: &str) -> bool {
    s.len() == 36 && hex_groups(s, &[8, 4, 4, 4, 12])
}

fn is_valid_uuid(s: &str) -> bool {
    if !is_valid_guid(s) {
        return false;
    }
    let lower = s.to_ascii_lowercase();
    if lower == "00000000-0000-0000-0000-000000000000"
        || lower == "ffffffff-ffff-ffff-ffff-ffffffffffff"
    {
        return true;
    }
    let bytes = lower.as_bytes();
    let version = bytes[14];
    let variant = bytes[19];
    (b'1'..=b'8').contains(&version) && matches!(variant, b'8' | b'9' | b'a' | b'b')
}

fn is_valid_ipv4(s: &str) -> bool {
    let parts: Vec<&str> = s.split('.').collect();
    if parts.len() != 4 {
        return false;
    }
    parts.iter().all(|part| {
        !part.is_empty()
            && part.len() <= 3
            && !(part.len() > 1 && part.starts_with('0'))
            && part.bytes().all(|b| b.is_ascii_digit())
            && part.parse::<u16>().map_or(false, |n| n <= 255)
    })
}

fn is_valid_ipv6(s: &str) -> bool {
    if s == "::" {
        return true;
    }
    let has_double_colon = s.contains("::");
    if s.matches("::").count() > 1 {
        return false;
    }
    let (left, right) = match s.split_once("::") {
        Some((l, r)) => (l, r),
        None => (s, ""),
    };
    let split = |part: &str| -> Vec<String> {
        if part.is_empty() {
            Vec::new()
        } else {
            part.split(':').map(str::to_string).collect()
        }
    };
    let mut groups = split(left);
    groups.extend(split(right));

    // An embedded IPv4 tail counts as two groups.
    let mut total = groups.len();
    if let Some(last) = groups.last() {
        if last.contains('.') {
            if !is_valid_ipv4(last) {
                return false;
            }
            groups.pop();
            total += 1;
        }
    }

    if has_double_colon {
        if total > 7 {
            return false;
        }
    } else if total != 8 {
        return false;
    }

    groups
        .iter()
        .all(|g| !g.is_empty() && g.len() <= 4 && g.chars().all(|c| c.is_ascii_hexdigit()))
}

fn is_valid_cidr(s: &str, ip: fn(&str) -> bool, max_prefix: u8) -> bool {
    let Some((addr, prefix)) = s.split_once('/') else {
        return false;
    };
    !prefix.is_empty()
        && prefix.bytes().all(|b| b.is_ascii_digit())
        && prefix.parse::<u8>().map_or(false, |p| p <= max_prefix)
        && ip(addr)
}

fn is_valid_mac(s: &str, delimiter: char) -> bool {
    let groups: Vec<&str> = s.split(delimiter).collect();
    groups.len() == 6
        && groups
            .iter()
            .all(|g| g.len() == 2 && g.bytes().all(|b| b.is_ascii_hexdigit()))
}

fn is_valid_base64(s: &str) -> bool {
    if s.is_empty() || s.len() % 4 != 0 {
        return false;
    }
    let mut pad_started = false;
    for &b in s.as_bytes() {
        if pad_started {
            if b != b'=' {
                return false;
            }
        } else if b == b'=' {
            pad_started = true;
        } else if !(b.is_ascii_alphanumeric() || b == b'+' || b == b'/') {
            return false;
        }
    }
    let pad_count = s.bytes().rev().take_while(|&b| b == b'=').count();
    pad_count <= 2
}

fn is_valid_base64url(s: &str) -> bool {
    let body = s.trim_end_matches('=');
    s.len() - body.len() <= 2
        && body
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

fn is_valid_jwt(s: &str, alg: Option<&str>) -> bool {
    let parts: Vec<&str> = s.split('.').collect();
    if parts.len() != 3 || !parts.iter().all(|p| is_valid_base64url(p)) {
        return false;
    }
    let Ok(header) = URL_SAFE_NO_PAD.decode(parts[0].trim_end_matches('=')) else {
        return false;
    };
    let Ok(header) = serde_json::from_slice::<serde_json::Value>(&header) else {
        return false;
    };
    let Some(header) = header.as_object() else {
        return false;
    };
    if let Some(typ) = header.get("typ") {
        if typ.as_str() != Some("JWT") {
            return false;
        }
    }
    match (header.get("alg").and_then(|a| a.as_str()), alg) {
        (None, _) => false,
        (Some(found), Some(wanted)) => found == wanted,
        (Some(_), None) => true,
    }
}

fn is_valid_e164(s: &str) -> bool {
    let Some(digits) = s.strip_prefix('+') else {
        return false;
    };
    (7..=15).contains(&digits.len())
        && !digits.starts_with('0')
        && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Splits `n` leading ASCII digits off `s`.
fn parse_digits(s: &str, n: usize) -> Option<(u32, &str)> {
    if s.len() < n || !s.is_char_boundary(n) {
        return None;
    }
    let (digits, rest) = s.split_at(n);
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse::<u32>().ok().map(|v| (v, rest))
}

fn days_in_month(year: u32, month: u32) -> u32 {
    match month {
        2 if (year % 4 == 0 && year % 100 != 0) || year % 400 == 0 => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

fn is_valid_iso_date(s: &str) -> bool {
    // YYYY-MM-DD
    if s.len() != 10 {
        return false;
    }
    let parsed = (|| {
        let (year, rest) = parse_digits(s, 4)?;
        let (month, rest) = parse_digits(rest.strip_prefix('-')?, 2)?;
        let (day, rest) = parse_digits(rest.strip_prefix('-')?, 2)?;
        rest.is_empty().then_some((year, month, day))
    })();
    match parsed {
        Some((year, month, day)) => {
            (1..=12).contains(&month) && day >= 1 && day <= days_in_month(year, month)
        }
        None => false,
    }
}

fn is_valid_iso_time(s: &str, precision: Option<u8>) -> bool {
    // HH:MM[:SS[.frac]]
    let parsed = (|| {
        let (hour, rest) = parse_digits(s, 2)?;
        let (min, rest) = parse_digits(rest.strip_prefix(':')?, 2)?;
        Some((hour, min, rest))
    })();
    let Some((hour, min, rest)) = parsed else {
        return false;
    };
    if hour > 23 || min > 59 {
        return false;
    }
    if rest.is_empty() {
        return precision.is_none();
    }
    let Some(rest) = rest.strip_prefix(':') else {
        return false;
    };
    let Some((sec, rest)) = parse_digits(rest, 2) else {
        return false;
    };
    if sec > 59 {
        return false;
    }
    let frac = match rest.strip_prefix('.') {
        Some(frac) if !frac.is_empty() && frac.bytes().all(|b| b.is_ascii_digit()) => frac,
        Some(_) => return false,
        None if rest.is_empty() => "",
        None => return false,
    };
    match precision {
        Some(p) => frac.len() == p as usize,
        None => true,
    }
}

fn is_valid_offset(tz: &str) -> bool {
    let Some(body) = tz.strip_prefix('+').or_else(|| tz.strip_prefix('-')) else {
        return false;
    };
    let parsed = (|| {
        let (h, rest) = parse_digits(body, 2)?;
        let rest = rest.strip_prefix(':').unwrap_or(rest);
        let (m, rest) = parse_digits(rest, 2)?;
        rest.is_empty().then_some((h, m))
    })();
    matches!(parsed, Some((h, m)) if h <= 23 && m <= 59)
}

fn is_valid_iso_datetime(s: &str, opts: &IsoDatetimeOptions) -> bool {
    // YYYY-MM-DDTHH:MM[:SS[.frac]][Z|+HH:MM|-HH:MM]
    let Some((date, after_t)) = s.split_once('T') else {
        return false;
    };
    if !is_valid_iso_date(date) {
        return false;
    }
    let tz_start = after_t.find(['Z', '+', '-']);
    let (time, tz) = match tz_start {
        Some(pos) => after_t.split_at(pos),
        None => (after_t, ""),
    };
    // Datetimes require at least HH:MM:SS unless local without seconds.
    let seconds_ok = time.len() >= 8 || (opts.local && tz.is_empty());
    if !seconds_ok || !is_valid_iso_time(time, opts.precision) {
        return false;
    }
    match tz {
        "" => opts.local,
        "Z" => true,
        other => opts.offset && is_valid_offset(other),
    }
}

fn is_valid_iso_duration(s: &str) -> bool {
    // PnYnMnWnDTnHnMnS, at least one component, fractions only on the last.
    let Some(body) = s.strip_prefix('P') else {
        return false;
    };
    let (date_part, time_part) = match body.split_once('T') {
        Some((d, t)) => {
            if t.is_empty() {
                return false;
            }
            (d, Some(t))
        }
        None => (body, None),
    };

    fn components(part: &str, allowed: &[char]) -> Option<usize> {
        let mut count = 0;
        let mut number = String::new();
        let mut next_allowed = 0;
        for c in part.chars() {
            if c.is_ascii_digit() || c == '.' || c == ',' {
                number.push(c);
                continue;
            }
            let idx = allowed[next_allowed..].iter().position(|&a| a == c)? + next_allowed;
            let digits_ok = !number.is_empty()
                && number.chars().filter(|c| *c == '.' || *c == ',').count() <= 1
                && number.chars().next().map_or(false, |c| c.is_ascii_digit());
            if !digits_ok {
                return None;
            }
            number.clear();
            next_allowed = idx + 1;
            count += 1;
        }
        number.is_empty().then_some(count)
    }

    let Some(date_count) = components(date_part, &['Y', 'M', 'W', 'D']) else {
        return false;
    };
    let time_count = match time_part {
        Some(t) => match components(t, &['H', 'M', 'S']) {
            Some(0) | None => return false,
            Some(n) => n,
        },
        None => 0,
    };
    date_count + time_count > 0
}

fn is_valid_hostname(s: &str) -> bool {
    if s.is_empty() || s.len() > 253 {
        return false;
    }
    s.split('.').all(|label| {
        !label.is_empty()
            && label.len() <= 63
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    })
}

fn is_valid_cuid2(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) if first.is_ascii_lowercase() => {
            chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        }
        _ => false,
    }
}

fn is_valid_ulid(s: &str) -> bool {
    // Crockford base32 alphabet, without I L O U
    s.len() == 26
        && s.chars().all(|c| {
            matches!(c.to_ascii_uppercase(), '0'..='9' | 'A'..='H' | 'J' | 'K' | 'M' | 'N' | 'P'..='T' | 'V'..='Z')
        })
}

fn is_valid_nanoid(s: &str) -> bool {
    s.len() == 21
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

fn is_valid_emoji(s: &str) -> bool {
    !s.is_empty()
        && s.chars().all(|c| {
            let cp = c as u32;
            (0x1F600..=0x1F64F).contains(&cp)
                || (0x1F300..=0x1F5FF).contains(&cp)
                || (0x1F680..=0x1F6FF).contains(&cp)
                || (0x1F1E0..=0x1F1FF).contains(&cp)
                || (0x2702..=0x27B0).contains(&cp)
                || (0x2600..=0x26FF).contains(&cp)
                || (0xFE00..=0xFE0F).contains(&cp)
                || (0x1F900..=0x1F9FF).contains(&cp)
                || (0x1FA00..=0x1FAFF).contains(&cp)
                || (0x1F3FB..=0x1F3FF).contains(&cp)
                || (0x231A..=0x231B).contains(&cp)
                || (0x23E9..=0x23F3).contains(&cp)
                || (0x23F8..=0x23FA).contains(&cp)
                || cp == 0x200D
                || cp == 0x2B50
                || cp == 0x2764
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emails() {
        assert!(StringFormat::Email.validate("user@example.com"));
        assert!(!StringFormat::Email.validate("user@localhost"));
        assert!(!StringFormat::Email.validate("a..b@example.com"));
        assert!(!StringFormat::Email.validate("@example.com"));
    }

    #[test]
    fn uuids_check_version_and_variant() {
        assert!(StringFormat::Uuid.validate("123e4567-e89b-42d3-a456-426614174000"));
        assert!(!StringFormat::Uuid.validate("123e4567-e89b-02d3-a456-426614174000"));
        assert!(StringFormat::Guid.validate("123e4567-e89b-02d3-c456-426614174000"));
        assert!(StringFormat::Uuid.validate("00000000-0000-0000-0000-000000000000"));
    }

    #[test]
    fn ip_addresses_and_ranges() {
        assert!(StringFormat::Ipv4.validate("192.168.0.1"));
        assert!(!StringFormat::Ipv4.validate("192.168.0.01"));
        assert!(StringFormat::Ipv6.validate("2001:db8::1"));
        assert!(StringFormat::Ipv6.validate("::ffff:192.168.0.1"));
        assert!(!StringFormat::Ipv6.validate("1::2::3"));
        assert!(StringFormat::CidrV4.validate("10.0.0.0/8"));
        assert!(!StringFormat::CidrV4.validate("10.0.0.0/33"));
        assert!(StringFormat::CidrV6.validate("2001:db8::/32"));
    }

    #[test]
    fn mac_addresses() {
        let mac = StringFormat::Mac { delimiter: ':' };
        assert!(mac.validate("00:1A:2b:3C:4d:5E"));
        assert!(!mac.validate("00-1A-2b-3C-4d-5E"));
        assert!(StringFormat::Mac { delimiter: '-' }.validate("00-1A-2b-3C-4d-5E"));
    }

    #[test]
    fn jwt_header_is_decoded() {
        // {"alg":"HS256","typ":"JWT"}
        let token = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.eyJzdWIiOiIxIn0.c2ln";
        assert!(StringFormat::Jwt { alg: None }.validate(token));
        assert!(StringFormat::Jwt { alg: Some("HS256".into()) }.validate(token));
        assert!(!StringFormat::Jwt { alg: Some("RS256".into()) }.validate(token));
        assert!(!StringFormat::Jwt { alg: None }.validate("a.b"));
    }

    #[test]
    fn iso_dates_respect_calendar() {
        assert!(StringFormat::Date.validate("2024-02-29"));
        assert!(!StringFormat::Date.validate("2023-02-29"));
        assert!(!StringFormat::Date.validate("2024-13-01"));
    }

    #[test]
    fn iso_datetimes() {
        let strict = StringFormat::Datetime(IsoDatetimeOptions::default());
        assert!(strict.validate("2024-01-01T10:20:30Z"));
        assert!(strict.validate("2024-01-01T10:20:30.123Z"));
        assert!(!strict.validate("2024-01-01T10:20:30+02:00"));
        assert!(!strict.validate("2024-01-01T10:20:30"));
        let relaxed = StringFormat::Datetime(IsoDatetimeOptions {
            offset: true,
            local: true,
            precision: Some(3),
        });
        assert!(relaxed.validate("2024-01-01T10:20:30.123+02:00"));
        assert!(relaxed.validate("2024-01-01T10:20:30.123"));
        assert!(!relaxed.validate("2024-01-01T10:20:30.1Z"));
    }

    #[test]
    fn iso_durations() {
        for ok in ["P1Y", "P3Y6M4DT12H30M5S", "PT0.5S", "P2W", "PT36H"] {
            assert!(StringFormat::Duration.validate(ok), "{}", ok);
        }
        for bad in ["P", "PT", "P1H", "1Y", "P1M1Y"] {
            assert!(!StringFormat::Duration.validate(bad), "{}", bad);
        }
    }

    #[test]
    fn misc_formats() {
        assert!(StringFormat::E164.validate("+14155552671"));
        assert!(!StringFormat::E164.validate("14155552671"));
        assert!(StringFormat::Json.validate(r#"{"a":1}"#));
        assert!(!StringFormat::Json.validate("{a:1}"));
        assert!(StringFormat::Base64.validate("aGVsbG8="));
        assert!(StringFormat::Base64Url.validate("aGVsbG8"));
        assert!(StringFormat::Ulid.validate("01ARZ3NDEKTSV4RRFFQ69G5FAV"));
        assert!(StringFormat::Nanoid.validate("V1StGXR8_Z5jdHi6B-myT"));
        assert!(StringFormat::Cuid2.validate("tz4a98xxat96iws9zmbrgj3a"));
        assert!(StringFormat::Url.validate("https://example.com/path?q=1"));
        assert!(!StringFormat::Url.validate("example.com"));
        assert!(StringFormat::Emoji.validate("😀"));
        assert!(!StringFormat::Emoji.validate("a😀"));
    }
}
