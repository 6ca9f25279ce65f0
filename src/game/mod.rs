// Game module - THE TABLE (client side)
// Round coordination, dice state, triplet grouping and user notices

mod config;
mod dice;
mod grouping;
mod notice;
mod session;
mod throw;

pub use config::{GameConfig, GameConfigError, ThrowRole};
pub use dice::{AssignedPositions, DiceTable, DieState};
pub use grouping::{Group, GroupingEngine, GroupingError, SelectionOutcome, MIN_GROUP_SIZE};
pub use notice::{NoticeConfig, NoticeQueue, NoticeTick};
pub use session::{FanOutReport, GameSession, Incoming, SessionError};
pub use throw::{RoundState, ThrowCoordinator, ThrowError};
