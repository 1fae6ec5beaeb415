//! System prompt for the travel-recommendation persona
//!
//! This module holds the fixed instruction prepended to every outbound
//! request. It is a pure constant: never stored in a [`Session`], never
//! mutated at runtime, always the first message of the payload.
//!
//! [`Session`]: crate::session::Session

use crate::session::Turn;

/// Fixed persona directive sent as the first message of every request
///
/// Instructs the model to act as a well-known travel YouTuber and to
/// answer with numbered lists of destinations and restaurants for the
/// requested region.
pub const SYSTEM_PROMPT: &str = "너는 유명한 여행 유튜버야. \
    입력받은 지역의 여행지와 맛집을 추천해줘. \
    여행지와 맛집을 나눠서 숫자 말머리를 넣어 출력해줘.";

/// Builds a fresh system turn from the fixed instruction
///
/// # Examples
///
/// ```
/// use waypoint::prompts::{system_turn, SYSTEM_PROMPT};
/// use waypoint::session::Role;
///
/// let turn = system_turn();
/// assert_eq!(turn.role, Role::System);
/// assert_eq!(turn.content, SYSTEM_PROMPT);
/// ```
pub fn system_turn() -> Turn {
    Turn::system(SYSTEM_PROMPT)
}
