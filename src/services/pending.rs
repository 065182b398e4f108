// Resource families with no operations yet. Each is a named handle over
// the shared client so endpoints can be added without touching callers.

use crate::api::ApiClient;

macro_rules! resource_handle {
    ($($(#[$doc:meta])* $name:ident;)*) => {
        $(
            $(#[$doc])*
            #[derive(Debug, Clone, Copy)]
            pub struct $name<'a> {
                #[allow(dead_code)]
                client: &'a ApiClient,
            }

            impl<'a> $name<'a> {
                pub fn new(client: &'a ApiClient) -> Self {
                    $name { client }
                }
            }
        )*
    };
}

resource_handle! {
    /// Group membership: add, results, remove, update.
    MembersService;
    /// One-to-one chat listing.
    ChatsService;
    /// Direct message listing and sending.
    DirectMessagesService;
    /// Most liked messages and the user's likes and hits.
    LeaderboardService;
    /// Bot registration and posting.
    BotsService;
    /// The authenticated user's profile.
    UsersService;
    /// SMS mode.
    SmsService;
    /// User blocks.
    BlocksService;
}
