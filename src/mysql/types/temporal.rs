use byteorder::LittleEndian;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use crate::io::{Buf, BufMut};
use crate::mysql::protocol::TypeId;
use crate::mysql::value::{BoxDynError, Decode, Encode, MySqlValueFormat, MySqlValueRef};

/// `DATE`/`NEWDATE`: variable-length binary encoding (0 or 4 bytes), `YYYY-MM-DD`
/// text.
impl<'r> Decode<'r> for NaiveDate {
    fn decode(value: MySqlValueRef<'r>) -> Result<Self, BoxDynError> {
        match value.format() {
            MySqlValueFormat::Text => {
                let bytes = value.bytes()?;
                let s = std::str::from_utf8(bytes)?;
                Ok(NaiveDate::parse_from_str(s, "%Y-%m-%d")?)
            }
            MySqlValueFormat::Binary => {
                let body = value.variable_length_bytes()?;
                decode_binary_date(body)
            }
        }
    }
}

impl Encode for NaiveDate {
    fn encode(&self, buf: &mut Vec<u8>) {
        buf.put_u8(4);
        buf.put_u16::<LittleEndian>(self.format("%Y").to_string().parse().unwrap_or(0));
        buf.put_u8(chrono::Datelike::month(self) as u8);
        buf.put_u8(chrono::Datelike::day(self) as u8);
    }

    fn type_id(&self) -> TypeId {
        TypeId::DATE
    }
}

/// `DATETIME`/`TIMESTAMP`: variable-length binary encoding (0, 4, 7, or 11
/// bytes -- the trailing bytes are added only as hour/min/sec and microseconds are non-zero).
/// Leap-day datetimes round-trip because the date component is a real
/// `NaiveDate`.
impl<'r> Decode<'r> for NaiveDateTime {
    fn decode(value: MySqlValueRef<'r>) -> Result<Self, BoxDynError> {
        match value.format() {
            MySqlValueFormat::Text => {
                let bytes = value.bytes()?;
                let s = std::str::from_utf8(bytes)?;

                if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f") {
                    return Ok(dt);
                }

                let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")?;
                Ok(date.and_hms_opt(0, 0, 0).expect("midnight is always valid"))
            }
            MySqlValueFormat::Binary => {
                let body = value.variable_length_bytes()?;
                let date = decode_binary_date(body)?;

                let mut cursor = &body[4.min(body.len())..];
                let (hour, minute, second, micros) = if cursor.len() >= 3 {
                    let h = cursor.get_u8()?;
                    let m = cursor.get_u8()?;
                    let s = cursor.get_u8()?;
                    let micros = if cursor.len() >= 4 {
                        cursor.get_u32::<LittleEndian>()?
                    } else {
                        0
                    };
                    (h, m, s, micros)
                } else {
                    (0, 0, 0, 0)
                };

                Ok(date
                    .and_hms_micro_opt(hour as u32, minute as u32, second as u32, micros)
                    .ok_or("invalid time-of-day in DATETIME value")?)
            }
        }
    }
}

impl Encode for NaiveDateTime {
    fn encode(&self, buf: &mut Vec<u8>) {
        let has_micros = self.and_utc().timestamp_subsec_micros() != 0;
        let has_time = has_micros || self.hour() != 0 || self.minute() != 0 || self.second() != 0;

        buf.put_u8(if has_micros { 11 } else if has_time { 7 } else { 4 });
        buf.put_u16::<LittleEndian>(chrono::Datelike::year(self) as u16);
        buf.put_u8(chrono::Datelike::month(self) as u8);
        buf.put_u8(chrono::Datelike::day(self) as u8);

        if has_time {
            buf.put_u8(self.hour() as u8);
            buf.put_u8(self.minute() as u8);
            buf.put_u8(self.second() as u8);

            if has_micros {
                buf.put_u32::<LittleEndian>(self.and_utc().timestamp_subsec_micros());
            }
        }
    }

    fn type_id(&self) -> TypeId {
        TypeId::DATETIME
    }
}

/// `TIME`: a signed duration that can exceed 24 hours, unlike a clock
/// time-of-day -- modeled as a dedicated newtype rather than `chrono::NaiveTime`, which
/// cannot represent that range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MySqlTime {
    pub is_negative: bool,
    pub days: u32,
    pub hours: u8,
    pub minutes: u8,
    pub seconds: u8,
    pub microseconds: u32,
}

impl<'r> Decode<'r> for MySqlTime {
    fn decode(value: MySqlValueRef<'r>) -> Result<Self, BoxDynError> {
        match value.format() {
            MySqlValueFormat::Text => {
                let bytes = value.bytes()?;
                let s = std::str::from_utf8(bytes)?;
                parse_text_time(s)
            }
            MySqlValueFormat::Binary => {
                let body = value.variable_length_bytes()?;

                if body.is_empty() {
                    return Ok(MySqlTime {
                        is_negative: false,
                        days: 0,
                        hours: 0,
                        minutes: 0,
                        seconds: 0,
                        microseconds: 0,
                    });
                }

                let mut cursor = body;
                let is_negative = cursor.get_u8()? != 0;
                let days = cursor.get_u32::<LittleEndian>()?;
                let hours = cursor.get_u8()?;
                let minutes = cursor.get_u8()?;
                let seconds = cursor.get_u8()?;
                let microseconds = if cursor.len() >= 4 {
                    cursor.get_u32::<LittleEndian>()?
                } else {
                    0
                };

                Ok(MySqlTime {
                    is_negative,
                    days,
                    hours,
                    minutes,
                    seconds,
                    microseconds,
                })
            }
        }
    }
}

impl Encode for MySqlTime {
    fn encode(&self, buf: &mut Vec<u8>) {
        let has_micros = self.microseconds != 0;
        buf.put_u8(if has_micros { 12 } else { 8 });
        buf.put_u8(self.is_negative as u8);
        buf.put_u32::<LittleEndian>(self.days);
        buf.put_u8(self.hours);
        buf.put_u8(self.minutes);
        buf.put_u8(self.seconds);

        if has_micros {
            buf.put_u32::<LittleEndian>(self.microseconds);
        }
    }

    fn type_id(&self) -> TypeId {
        TypeId::TIME
    }
}

fn parse_text_time(s: &str) -> Result<MySqlTime, BoxDynError> {
    let (is_negative, rest) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s),
    };

    let (hms, micros) = match rest.split_once('.') {
        Some((hms, frac)) => {
            let mut frac = frac.to_owned();
            while frac.len() < 6 {
                frac.push('0');
            }
            (hms, frac[..6].parse()?)
        }
        None => (rest, 0),
    };

    let parts: Vec<&str> = hms.split(':').collect();
    if parts.len() != 3 {
        return Err(format!("malformed TIME value: {s:?}").into());
    }

    let total_hours: u32 = parts[0].parse()?;
    let minutes: u8 = parts[1].parse()?;
    let seconds: u8 = parts[2].parse()?;

    Ok(MySqlTime {
        is_negative,
        days: total_hours / 24,
        hours: (total_hours % 24) as u8,
        minutes,
        seconds,
        microseconds: micros,
    })
}

/// `YEAR`: binary-encoded as a 2-byte unsigned int, text as a 4-digit string.
pub fn decode_year<'r>(value: MySqlValueRef<'r>) -> Result<u16, BoxDynError> {
    match value.format() {
        MySqlValueFormat::Text => Ok(std::str::from_utf8(value.bytes()?)?.parse()?),
        MySqlValueFormat::Binary => {
            let mut buf = value.bytes()?;
            Ok(buf.get_u16::<LittleEndian>()?)
        }
    }
}

fn decode_binary_date(body: &[u8]) -> Result<NaiveDate, BoxDynError> {
    if body.len() < 4 {
        return Ok(NaiveDate::from_ymd_opt(0, 1, 1).expect("the MySQL zero date placeholder"));
    }

    let mut cursor = body;
    let year = cursor.get_u16::<LittleEndian>()?;
    let month = cursor.get_u8()?;
    let day = cursor.get_u8()?;

    NaiveDate::from_ymd_opt(year as i32, month.max(1) as u32, day.max(1) as u32)
        .ok_or_else(|| format!("invalid DATE wire value: {year}-{month}-{day}").into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_parses_negative_time_over_24h() {
        let t = parse_text_time("-838:59:59").unwrap();
        assert!(t.is_negative);
        assert_eq!(t.days, 34);
        assert_eq!(t.hours, 22);
    }

    #[test]
    fn it_parses_fractional_time() {
        let t = parse_text_time("10:20:30.5").unwrap();
        assert_eq!(t.microseconds, 500_000);
    }

    #[test]
    fn it_round_trips_a_leap_day() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        let mut buf = Vec::new();
        date.encode(&mut buf);

        // skip the length byte written by `encode`, mirroring how `variable_length_bytes`
        // already strips it off a real row before `decode_binary_date` sees it.
        let decoded = decode_binary_date(&buf[1..]).unwrap();
        assert_eq!(decoded, date);
    }
}
