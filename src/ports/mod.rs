pub mod book_repository;
pub mod loan_repository;
pub mod member_repository;

pub use book_repository::{BookRepository, InsertBookError};
pub use loan_repository::{CompleteLoanError, InsertLoanError, LoanRepository};
pub use member_repository::{InsertMemberError, MemberRepository};
