//! Identifier newtypes for the rows of the hosted store.

crate::define_id_type!(uuid::Uuid, UserId);
crate::define_id_type!(i64, ScheduleRuleId);
crate::define_id_type!(i64, SessionId);
crate::define_id_type!(i64, ProgressEntryId);

impl UserId {
    /// Generate a fresh random user id.
    pub fn random() -> Self {
        UserId(uuid::Uuid::new_v4())
    }
}
