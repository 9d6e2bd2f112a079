mod session_dto;

pub use session_dto::{
    LoginDto, RegisterClaimantDto, RegisterReviewerDto, SessionProfileDto, SessionResponseDto,
};
