use super::text_date;
use crate::codec::{
    parse_field, BinaryFormat, CodecError, FieldError, FieldReader, FieldWriter, ObjectFormat,
    TextFormat,
};
use crate::entity::TicketRecord;
use travelog_core::{format_date, TicketDetails};

impl BinaryFormat for TicketRecord {
    fn write_fields(&self, out: &mut FieldWriter) -> Result<(), CodecError> {
        let details = &self.details;
        out.write_i32(self.belongs_to);
        out.write_str("destination", &details.destination)?;
        out.write_date("start_date", details.start_date)?;
        out.write_date("end_date", details.end_date)?;
        out.write_f64(details.cost);
        out.write_bool(details.checked_in);
        out.write_str("description", &details.description)
    }

    fn read_fields(input: &mut FieldReader<'_>) -> Result<Self, FieldError> {
        let belongs_to = input.read_i32("belongs_to")?;
        let details = TicketDetails {
            destination: input.read_str("destination")?,
            start_date: input.read_date("start_date")?,
            end_date: input.read_date("end_date")?,
            cost: input.read_f64("cost")?,
            checked_in: input.read_bool("checked_in")?,
            description: input.read_str("description")?,
        };
        Ok(TicketRecord {
            belongs_to,
            details,
        })
    }
}

impl TextFormat for TicketRecord {
    const FIELD_COUNT: usize = 7;

    fn to_fields(&self) -> Vec<String> {
        let details = &self.details;
        vec![
            self.belongs_to.to_string(),
            details.destination.clone(),
            format_date(details.start_date),
            format_date(details.end_date),
            cost_text(details.cost),
            details.checked_in.to_string(),
            details.description.clone(),
        ]
    }

    fn from_fields(fields: &[&str]) -> Result<Self, FieldError> {
        Ok(TicketRecord {
            belongs_to: parse_field("belongs_to", fields[0])?,
            details: TicketDetails {
                destination: fields[1].to_string(),
                start_date: text_date("start_date", fields[2])?,
                end_date: text_date("end_date", fields[3])?,
                cost: parse_field("cost", fields[4])?,
                // Anything but "true" reads as not checked in.
                checked_in: fields[5].eq_ignore_ascii_case("true"),
                description: fields[6].to_string(),
            },
        })
    }
}

/// Cost with two decimals, rounding half away from zero on the shortest
/// decimal form of the value, so `1.005` is written as `1.01`.
fn cost_text(cost: f64) -> String {
    if !cost.is_finite() {
        return format!("{:.2}", cost);
    }
    // f64 Display is the shortest round-trip form and never uses an exponent.
    let shortest = cost.to_string();
    let (sign, unsigned) = match shortest.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", shortest.as_str()),
    };
    let (int_part, frac_part) = unsigned.split_once('.').unwrap_or((unsigned, ""));

    let mut digits: Vec<u8> = int_part.bytes().collect();
    let mut frac = frac_part.bytes();
    digits.push(frac.next().unwrap_or(b'0'));
    digits.push(frac.next().unwrap_or(b'0'));

    if matches!(frac.next(), Some(d) if d >= b'5') {
        let mut carry = true;
        for digit in digits.iter_mut().rev() {
            if *digit == b'9' {
                *digit = b'0';
            } else {
                *digit += 1;
                carry = false;
                break;
            }
        }
        if carry {
            digits.insert(0, b'1');
        }
    }

    let split = digits.len() - 2;
    let int_digits = String::from_utf8_lossy(&digits[..split]);
    let cents = String::from_utf8_lossy(&digits[split..]);
    format!("{}{}.{}", sign, int_digits, cents)
}

impl ObjectFormat for TicketRecord {
    type Payload = TicketDetails;

    fn object_key(&self, _position: usize) -> i32 {
        self.belongs_to
    }

    fn payload(&self) -> &TicketDetails {
        &self.details
    }

    fn from_parts(key: i32, payload: TicketDetails) -> Self {
        TicketRecord {
            belongs_to: key,
            details: payload,
        }
    }
}
