pub mod collect;
pub mod precheck;
pub mod shared;

pub mod prelude {
    pub use crate::collect::prelude::*;
    pub use crate::precheck::prelude::*;
    pub use crate::shared::prelude::*;
}
