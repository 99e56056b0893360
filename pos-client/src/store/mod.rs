//! 客户端数据层
//!
//! 服务端数据的本地镜像：`StoreState` 是纯数据，`reduce` 是纯函数，
//! [`Store`] 负责乐观更新与失败后的全量回拉对账。

mod action;
mod reducer;
mod state;
#[allow(clippy::module_inception)]
mod store;

pub use action::Action;
pub use reducer::reduce;
pub use state::StoreState;
pub use store::Store;
