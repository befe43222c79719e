use actix_web::{HttpRequest, delete, get, post, web};
use uuid::Uuid;

use crate::{
    api::{error, success},
    middlewares::get_claims,
    modules::{
        friend::{
            model::{
                FriendRequestBody, FriendRequestResponse, FriendRequestSent, FriendResponse,
                UserSearchQuery, UserSearchResult,
            },
            repository_pg::FriendRepositoryPg,
            service::FriendService,
        },
        user::repository_pg::UserRepositoryPg,
    },
    utils::{ValidatedJson, ValidatedQuery},
};

pub type FriendSvc = FriendService<FriendRepositoryPg, UserRepositoryPg>;

#[get("/search")]
pub async fn search_users(
    friend_service: web::Data<FriendSvc>,
    query: ValidatedQuery<UserSearchQuery>,
    req: HttpRequest,
) -> Result<success::Success<Vec<UserSearchResult>>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let users = friend_service.search_users(user_id, &query.0.query).await?;
    Ok(success::Success::ok(Some(users)).message("Users retrieved successfully"))
}

#[post("/request")]
pub async fn send_friend_request(
    friend_service: web::Data<FriendSvc>,
    body: ValidatedJson<FriendRequestBody>,
    req: HttpRequest,
) -> Result<success::Success<FriendRequestSent>, error::Error> {
    let requester_id = get_claims(&req)?.sub;
    let sent = friend_service.send_friend_request(requester_id, &body.0.username).await?;
    let message = format!("Friend request sent to {}", sent.to.display_name);
    Ok(success::Success::created(Some(sent)).message(message))
}

#[get("/requests/received")]
pub async fn list_received_requests(
    friend_service: web::Data<FriendSvc>,
    req: HttpRequest,
) -> Result<success::Success<Vec<FriendRequestResponse>>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let requests = friend_service.received_requests(user_id).await?;
    Ok(success::Success::ok(Some(requests)).message("Friend requests retrieved successfully"))
}

#[get("/requests/sent")]
pub async fn list_sent_requests(
    friend_service: web::Data<FriendSvc>,
    req: HttpRequest,
) -> Result<success::Success<Vec<FriendRequestResponse>>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let requests = friend_service.sent_requests(user_id).await?;
    Ok(success::Success::ok(Some(requests)).message("Friend requests retrieved successfully"))
}

#[post("/requests/{request_id}/accept")]
pub async fn accept_friend_request(
    friend_service: web::Data<FriendSvc>,
    request_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<FriendResponse>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let friend = friend_service.accept_friend_request(user_id, *request_id).await?;
    let message = format!("You are now friends with {}", friend.display_name);
    Ok(success::Success::ok(Some(friend)).message(message))
}

#[post("/requests/{request_id}/reject")]
pub async fn reject_friend_request(
    friend_service: web::Data<FriendSvc>,
    request_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<()>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    friend_service.reject_friend_request(user_id, *request_id).await?;
    Ok(success::Success::ok(None).message("Friend request rejected"))
}

#[get("/")]
pub async fn list_friends(
    friend_service: web::Data<FriendSvc>,
    req: HttpRequest,
) -> Result<success::Success<Vec<FriendResponse>>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let friends = friend_service.get_friends(user_id).await?;
    Ok(success::Success::ok(Some(friends)).message("Friends retrieved successfully"))
}

#[delete("/{friend_id}")]
pub async fn remove_friend(
    friend_service: web::Data<FriendSvc>,
    friend_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<()>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    friend_service.remove_friend(user_id, *friend_id).await?;
    Ok(success::Success::ok(None).message("Friend removed"))
}
