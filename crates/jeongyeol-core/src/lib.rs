pub mod citation;
pub mod level;
pub mod model;
pub mod symbol;

pub use citation::{Citation, item_number};
pub use level::classify_level;
pub use model::{Approver, ApproverBadge, CommonAnnotation, RuleEntry, Section};
pub use symbol::{RoleClass, Symbol};
