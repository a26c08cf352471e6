use crate::config::EligibilityRules;
use crate::schema::RawSalesRecord;
use crate::utils::{present_text, value_as_float, value_as_int};

/// Which rule a sales record failed first. Used for diagnostics only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ineligibility {
    Partner,
    Mrr,
    Year,
}

/// How many records each rule rejected in one screening pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RejectionCounts {
    pub partner: usize,
    pub mrr: usize,
    pub year: usize,
}

impl RejectionCounts {
    fn record(&mut self, reason: Ineligibility) {
        match reason {
            Ineligibility::Partner => self.partner += 1,
            Ineligibility::Mrr => self.mrr += 1,
            Ineligibility::Year => self.year += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.partner + self.mrr + self.year
    }
}

pub struct SalesEligibilityFilter<'a> {
    rules: &'a EligibilityRules,
}

impl<'a> SalesEligibilityFilter<'a> {
    pub fn new(rules: &'a EligibilityRules) -> Self {
        Self { rules }
    }

    pub fn check(&self, record: &RawSalesRecord) -> Result<(), Ineligibility> {
        let partner = record.get("partner_id").and_then(value_as_int);
        if partner != Some(self.rules.partner_id) {
            return Err(Ineligibility::Partner);
        }

        let mrr_matches = record
            .get("mrr_total")
            .and_then(value_as_float)
            .is_some_and(|mrr| (mrr - self.rules.mrr_target).abs() < self.rules.mrr_tolerance);
        if !mrr_matches {
            return Err(Ineligibility::Mrr);
        }

        // Substring match on the raw text, not a parsed year.
        let year_matches = record
            .get("date_add")
            .and_then(present_text)
            .is_some_and(|text| text.contains(self.rules.year_marker.as_str()));
        if !year_matches {
            return Err(Ineligibility::Year);
        }

        Ok(())
    }

    pub fn is_eligible(&self, record: &RawSalesRecord) -> bool {
        self.check(record).is_ok()
    }

    pub fn filter<'r>(&self, records: &'r [RawSalesRecord]) -> Vec<&'r RawSalesRecord> {
        records.iter().filter(|r| self.is_eligible(r)).collect()
    }

    /// Like [`filter`](Self::filter), also tallying the first rule each
    /// rejected record failed.
    pub fn screen<'r>(
        &self,
        records: &'r [RawSalesRecord],
    ) -> (Vec<&'r RawSalesRecord>, RejectionCounts) {
        let mut eligible = Vec::new();
        let mut rejected = RejectionCounts::default();

        for record in records {
            match self.check(record) {
                Ok(()) => eligible.push(record),
                Err(reason) => rejected.record(reason),
            }
        }

        (eligible, rejected)
    }
}
