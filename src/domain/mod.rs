pub mod loan;
pub mod order;
pub mod payment_method;
pub mod promotion;
pub mod ticket;

pub use loan::{Installment, InstallmentStatus, Loan, LoanStatus};
pub use order::{InstallmentPlan, LoanResult, OrderDetails, OrderItem};
pub use payment_method::Card;
pub use promotion::{CreditLimit, Promotion};
pub use ticket::{Message, Sender, Ticket, TicketStatus};
