use std::collections::BTreeMap;
use std::sync::LazyLock;

use chrono::NaiveDateTime;
use regex::Regex;

use super::OUTLET_PARAM_OFFSET;
use crate::error::{FenceError, Result};

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

static HTML_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new("<.*?>").unwrap());

/// Remove every `<...>` tag that does not span a line break.
///
/// The firmware wraps its plain-text answers in a few fixed, non-nested tags.
pub fn strip_tags(html: &str) -> String {
    HTML_TAG.replace_all(html, "").into_owned()
}

/// Power state of every outlet reported by one `GetPower` call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PowerStatus(BTreeMap<u8, bool>);

impl PowerStatus {
    pub fn get(&self, outlet: u8) -> Option<bool> {
        self.0.get(&outlet).copied()
    }

    /// State of `outlet`, or a parse error if the device did not report it.
    pub fn outlet(&self, outlet: u8) -> Result<bool> {
        self.get(outlet).ok_or_else(|| {
            FenceError::parse("GetPower", format!("outlet {} not reported", outlet))
        })
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u8, bool)> + '_ {
        self.0.iter().map(|(k, v)| (*k, *v))
    }
}

impl FromIterator<(u8, bool)> for PowerStatus {
    fn from_iter<I: IntoIterator<Item = (u8, bool)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Parse a `GetPower` body such as `<html>P60=1,P61=0</html>`.
pub fn parse_power(body: &str) -> Result<PowerStatus> {
    let text = strip_tags(body);
    let mut status = BTreeMap::new();

    for token in text.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        let (outlet, on) = parse_power_token(token)
            .ok_or_else(|| FenceError::parse("GetPower", format!("bad token {:?}", token)))?;
        status.insert(outlet, on);
    }

    if status.is_empty() {
        return Err(FenceError::parse("GetPower", "no outlets reported"));
    }

    Ok(PowerStatus(status))
}

fn parse_power_token(token: &str) -> Option<(u8, bool)> {
    let (param, value) = token.split_once('=')?;
    let param: u16 = param.trim().strip_prefix('P')?.parse().ok()?;
    let outlet = u8::try_from(param.checked_sub(OUTLET_PARAM_OFFSET)?).ok()?;
    if outlet == 0 {
        return None;
    }

    let on = match value.trim() {
        "0" => false,
        "1" => true,
        _ => return None,
    };

    Some((outlet, on))
}

/// Parse a `GetTime` body carrying `YYYY-MM-DD HH:MM:SS` in device local time.
pub fn parse_time(body: &str) -> Result<NaiveDateTime> {
    let text = strip_tags(body);
    let text = text.trim();

    NaiveDateTime::parse_from_str(text, TIME_FORMAT)
        .map_err(|e| FenceError::parse("GetTime", format!("{:?}: {}", text, e)))
}
