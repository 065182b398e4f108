// One façade per API resource family, each borrowing the shared ApiClient.

pub mod groups;
pub mod likes;
pub mod messages;
pub mod pending;

pub use groups::{GroupsIndexOptions, GroupsService};
pub use likes::LikesService;
pub use messages::{MessagesIndexOptions, MessagesService};
pub use pending::{
    BlocksService, BotsService, ChatsService, DirectMessagesService, LeaderboardService,
    MembersService, SmsService, UsersService,
};
