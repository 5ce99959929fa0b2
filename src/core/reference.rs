use crate::core::zodiac;
use crate::domain::model::ReferenceData;
use crate::utils::error::{ReadingError, Result};
use crate::utils::validation::{validate_non_empty_string, Validate};

pub const ZODIAC_SIGNS: usize = 12;

impl Validate for ReferenceData {
    /// Hard failures: wrong number of signs, empty remedy names. Calendar
    /// gaps only warn, since an uncovered day resolves to the unknown sign.
    fn validate(&self) -> Result<()> {
        if self.zodiac.len() != ZODIAC_SIGNS {
            return Err(ReadingError::ReferenceDataError {
                dataset: "zodiac table".to_string(),
                message: format!(
                    "expected {} records, found {}",
                    ZODIAC_SIGNS,
                    self.zodiac.len()
                ),
            });
        }

        for (index, record) in self.zodiac.iter().enumerate() {
            validate_non_empty_string(&format!("zodiac[{}].sign", index), &record.sign)?;
            for (label, boundary) in [("start", record.start), ("end", record.end)] {
                if !boundary.is_calendar_day() {
                    return Err(ReadingError::ReferenceDataError {
                        dataset: "zodiac table".to_string(),
                        message: format!(
                            "{} {} [{}, {}] is not a calendar day",
                            record.sign, label, boundary.month, boundary.day
                        ),
                    });
                }
            }
        }

        for (index, remedy) in self.remedies.iter().enumerate() {
            validate_non_empty_string(&format!("remedies[{}].name", index), &remedy.name)?;
        }

        let gaps = zodiac::uncovered_days(&self.zodiac);
        if !gaps.is_empty() {
            let days: Vec<String> = gaps.iter().map(ToString::to_string).collect();
            tracing::warn!(
                "⚠️ {} day(s) not covered by any zodiac record: {}",
                gaps.len(),
                days.join(", ")
            );
        }

        if self.remedies.is_empty() {
            tracing::warn!("⚠️ Remedy table is empty, no remedy will be recommended");
        }

        Ok(())
    }
}
