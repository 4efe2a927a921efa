// Состояние демо
// Session владеет ключами и журналом, views строит проекции для трёх наблюдателей

pub mod operation_log;
pub mod session;
pub mod views;

pub use operation_log::{OperationKind, OperationLog, OperationLogEntry};
pub use session::{KeyMaterial, Session};
pub use views::{
    Decryption, Direction, EavesdropperView, Exchange, Observer, ReceiverView, SenderView,
    ThreePartyObservation, ThreePartyView,
};
