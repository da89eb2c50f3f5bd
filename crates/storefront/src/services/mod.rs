//! Application services composing the backend clients and the stores.

pub mod checkout;
pub mod notify;
pub mod session;

pub use checkout::{CheckoutError, CheckoutService};
pub use notify::{Notice, NoticeKind, Notifier};
pub use session::{SessionProvider, SessionState, SessionUser};
