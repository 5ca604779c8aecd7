/// Database models for Pomotrack
///
/// Each model owns its SQL. Task and pomodoro accessors come in a
/// `_for_owner` family: every statement carries the owner's user id in its
/// predicate, so a request can only ever touch rows belonging to the
/// resolved identity. Handlers never compose their own ownership filters.
///
/// # Models
///
/// - `user`: accounts and credentials
/// - `task`: user-owned tasks
/// - `pomodoro`: focus sessions recorded against tasks, plus aggregates
/// - `pagination`: shared page/pageSize handling for list endpoints

pub mod pagination;
pub mod pomodoro;
pub mod task;
pub mod user;
