use crate::{middlewares::authentication, modules::user::handle::*};
use actix_web::{
    middleware::from_fn,
    web::{ServiceConfig, scope},
};

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(
        scope("/users").service(register).service(login).service(
            scope("").wrap(from_fn(authentication)).service(get_me).service(list_users),
        ),
    );
}
