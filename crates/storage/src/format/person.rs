use super::text_date;
use crate::codec::{
    parse_field, BinaryFormat, CodecError, FieldError, FieldReader, FieldWriter, ObjectFormat,
    TextFormat,
};
use travelog_core::{format_date, Person};

impl BinaryFormat for Person {
    fn write_fields(&self, out: &mut FieldWriter) -> Result<(), CodecError> {
        out.write_str("name", &self.name)?;
        out.write_str("sex", &self.sex)?;
        out.write_date("birth_date", self.birth_date)?;
        out.write_str("birthplace", &self.birthplace)?;
        out.write_str("nationality", &self.nationality)?;
        out.write_i32(self.id_number);
        out.write_str("document_number", &self.document_number)
    }

    fn read_fields(input: &mut FieldReader<'_>) -> Result<Self, FieldError> {
        Ok(Person {
            name: input.read_str("name")?,
            sex: input.read_str("sex")?,
            birth_date: input.read_date("birth_date")?,
            birthplace: input.read_str("birthplace")?,
            nationality: input.read_str("nationality")?,
            id_number: input.read_i32("id_number")?,
            document_number: input.read_str("document_number")?,
        })
    }
}

impl TextFormat for Person {
    const FIELD_COUNT: usize = 7;

    fn to_fields(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.sex.clone(),
            format_date(self.birth_date),
            self.birthplace.clone(),
            self.nationality.clone(),
            self.id_number.to_string(),
            self.document_number.clone(),
        ]
    }

    fn from_fields(fields: &[&str]) -> Result<Self, FieldError> {
        Ok(Person {
            name: fields[0].to_string(),
            sex: fields[1].to_string(),
            birth_date: text_date("birth_date", fields[2])?,
            birthplace: fields[3].to_string(),
            nationality: fields[4].to_string(),
            id_number: parse_field("id_number", fields[5])?,
            document_number: fields[6].to_string(),
        })
    }
}

// Persons reference nothing, so the key slot carries the record's own
// position.
impl ObjectFormat for Person {
    type Payload = Person;

    fn object_key(&self, position: usize) -> i32 {
        i32::try_from(position).unwrap_or(i32::MAX)
    }

    fn payload(&self) -> &Person {
        self
    }

    fn from_parts(_key: i32, payload: Person) -> Self {
        payload
    }
}
