use dns_noise_domain::{AnswerRecord, RecordType};
use hickory_proto::rr::{RData, Record, RecordType as HickoryRecordType};

pub struct RecordTypeMapper;

impl RecordTypeMapper {
    pub fn to_hickory(record_type: RecordType) -> HickoryRecordType {
        HickoryRecordType::from(record_type.to_u16())
    }

    /// Classifies one answer-section record.
    pub fn to_answer(record: &Record) -> AnswerRecord {
        match record.data() {
            RData::A(a) => AnswerRecord::A(a.0),
            RData::AAAA(aaaa) => AnswerRecord::AAAA(aaaa.0),
            RData::CNAME(canonical) => AnswerRecord::CNAME(canonical.to_utf8()),
            RData::MX(mx) => AnswerRecord::MX {
                preference: mx.preference(),
                exchange: mx.exchange().to_utf8(),
            },
            _ => AnswerRecord::Unsupported(u16::from(record.record_type())),
        }
    }
}
