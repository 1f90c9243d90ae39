pub mod dashboard;
pub mod image_cache;
pub mod loans;
pub mod order_flow;
pub mod payment_methods;
pub mod sale_validator;
pub mod security;
pub mod tickets;

pub use dashboard::{Dashboard, DashboardService};
pub use image_cache::{HttpPrefetcher, ImagePrefetcher, ImagePreloader, PreloadSummary};
pub use loans::{LoanDetails, LoanOverview, LoanService, PaymentReceipt};
pub use order_flow::{installment_options, Checkout, CheckoutFlow, CheckoutStep, OrderService};
pub use payment_methods::PaymentMethodService;
pub use sale_validator::{interpret_refusal, SaleValidation, SaleValidator};
pub use security::{SecurityGate, UnlockMethod, UnlockOutcome, MAX_PIN_ATTEMPTS};
pub use tickets::{NewTicket, TicketService};
