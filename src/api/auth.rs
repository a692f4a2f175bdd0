use log::info;
use rocket::{
    form::{Errors, Form},
    http::CookieJar,
    request::FlashMessage,
    response::{content::RawHtml, Flash, Redirect},
    Route, State,
};

use crate::{
    error::{Error, Result},
    model::{
        api::auth::{Credentials, Registration},
        auth::VoterSession,
        db::{NewVoter, Voter},
        sqlite::Db,
    },
    view, Config,
};

pub fn routes() -> Vec<Route> {
    routes![register_form, register, login_form, login, logout]
}

#[get("/register")]
pub fn register_form(flash: Option<FlashMessage<'_>>) -> RawHtml<String> {
    view::register(flash)
}

#[post("/register", data = "<registration>")]
pub async fn register(
    registration: std::result::Result<Form<Registration>, Errors<'_>>,
    mut db: Db,
) -> Result<Flash<Redirect>> {
    let registration = registration
        .map_err(|_| Error::IncompleteForm("/register"))?
        .into_inner();

    let voter = NewVoter::try_from(registration)?;
    voter.insert(&mut db).await?;
    info!("Registered voter {}", voter.voter_id);

    Ok(Flash::success(
        Redirect::to(uri!(login_form)),
        "Registration Successful. Please Login!",
    ))
}

#[get("/login")]
pub fn login_form(flash: Option<FlashMessage<'_>>) -> RawHtml<String> {
    view::login(flash)
}

/// Where a successful login leads.
#[derive(Responder)]
pub enum LoginRedirect {
    Ballot(Flash<Redirect>),
    AlreadyVoted(Redirect),
}

#[post("/login", data = "<credentials>")]
pub async fn login(
    credentials: std::result::Result<Form<Credentials>, Errors<'_>>,
    cookies: &CookieJar<'_>,
    mut db: Db,
    config: &State<Config>,
) -> Result<LoginRedirect> {
    let credentials = credentials.map_err(|_| Error::InvalidCredentials)?;

    let voter = Voter::find(&mut db, &credentials.voter_id)
        .await?
        .ok_or(Error::InvalidCredentials)?;
    if !voter.verify_password(&credentials.password)? {
        return Err(Error::InvalidCredentials);
    }

    VoterSession::bind(cookies, &voter.voter_id, config)?;
    info!("Voter {} logged in", voter.voter_id);

    if voter.has_voted {
        Ok(LoginRedirect::AlreadyVoted(Redirect::to(uri!(
            super::public::already_voted
        ))))
    } else {
        Ok(LoginRedirect::Ballot(Flash::success(
            Redirect::to(uri!(super::voting::ballot)),
            "Login Successful!",
        )))
    }
}

#[get("/logout")]
pub fn logout(cookies: &CookieJar<'_>) -> Flash<Redirect> {
    VoterSession::clear(cookies);
    Flash::new(
        Redirect::to(uri!(super::public::index)),
        "info",
        "Logged out successfully!",
    )
}

#[cfg(test)]
mod tests {
    use rocket::{
        http::{ContentType, Status},
        local::asynchronous::{Client, LocalResponse},
    };
    use sqlx::SqlitePool;

    use crate::model::{auth::AUTH_TOKEN_COOKIE, db::CandidateId};

    use super::*;

    fn location<'a>(response: &'a LocalResponse<'_>) -> Option<&'a str> {
        response.headers().get_one("Location")
    }

    async fn voter_count(db: &SqlitePool) -> i64 {
        Voter::count(&mut db.acquire().await.unwrap()).await.unwrap()
    }

    async fn submit_registration<'c>(
        client: &'c Client,
        registration: &Registration,
    ) -> LocalResponse<'c> {
        client
            .post(uri!(register))
            .header(ContentType::Form)
            .body(registration.to_form_body())
            .dispatch()
            .await
    }

    async fn submit_login<'c>(client: &'c Client, credentials: &Credentials) -> LocalResponse<'c> {
        client
            .post(uri!(login))
            .header(ContentType::Form)
            .body(credentials.to_form_body())
            .dispatch()
            .await
    }

    #[backend_test]
    async fn register_page_loads(client: Client) {
        let response = client.get(uri!(register_form)).dispatch().await;

        assert_eq!(Status::Ok, response.status());
        assert!(response
            .into_string()
            .await
            .unwrap()
            .contains(r#"name="voter_id""#));
    }

    #[backend_test]
    async fn register_valid(client: Client, db: SqlitePool) {
        let response = submit_registration(&client, &Registration::example()).await;

        assert_eq!(Status::SeeOther, response.status());
        assert_eq!(Some("/login"), location(&response));

        let voter = Voter::find(&mut db.acquire().await.unwrap(), "v1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(voter.name, "A");
        assert!(!voter.has_voted);
        // Plaintext is never stored.
        assert_ne!(voter.password_hash, "p");

        // The notice shows up on the login page.
        let html = client
            .get(uri!(login_form))
            .dispatch()
            .await
            .into_string()
            .await
            .unwrap();
        assert!(html.contains("Registration Successful"));
    }

    #[backend_test]
    async fn register_duplicate(client: Client, db: SqlitePool) {
        submit_registration(&client, &Registration::example()).await;
        assert_eq!(voter_count(&db).await, 1);

        let response = submit_registration(&client, &Registration::example()).await;

        assert_eq!(Status::SeeOther, response.status());
        assert_eq!(Some("/register"), location(&response));
        assert_eq!(voter_count(&db).await, 1);

        let html = client
            .get(uri!(register_form))
            .dispatch()
            .await
            .into_string()
            .await
            .unwrap();
        assert!(html.contains("Voter ID already exists!"));
    }

    #[backend_test]
    async fn register_empty_fields(client: Client, db: SqlitePool) {
        let response = submit_registration(&client, &Registration::empty()).await;

        assert_eq!(Status::SeeOther, response.status());
        assert_eq!(Some("/register"), location(&response));
        assert_eq!(voter_count(&db).await, 0);
    }

    #[backend_test]
    async fn login_valid(client: Client) {
        submit_registration(&client, &Registration::example()).await;

        let response = submit_login(&client, &Credentials::example()).await;

        assert_eq!(Status::SeeOther, response.status());
        assert_eq!(Some("/vote"), location(&response));
        assert!(client.cookies().get(AUTH_TOKEN_COOKIE).is_some());
    }

    #[backend_test]
    async fn login_wrong_password(client: Client) {
        submit_registration(&client, &Registration::example()).await;

        let response = submit_login(&client, &Credentials::wrong_password()).await;

        assert_eq!(Status::SeeOther, response.status());
        assert_eq!(Some("/login"), location(&response));
        assert!(client.cookies().get(AUTH_TOKEN_COOKIE).is_none());

        let html = client
            .get(uri!(login_form))
            .dispatch()
            .await
            .into_string()
            .await
            .unwrap();
        assert!(html.contains("Invalid Voter ID or Password!"));
        assert!(html.contains("alert-danger"));
    }

    #[backend_test]
    async fn login_missing_fields(client: Client) {
        submit_registration(&client, &Registration::example()).await;

        for body in ["", "voter_id=v1", "password=p", "voter_id=&password=p"] {
            let response = client
                .post(uri!(login))
                .header(ContentType::Form)
                .body(body)
                .dispatch()
                .await;

            assert_eq!(Status::SeeOther, response.status());
            assert_eq!(Some("/login"), location(&response));
            assert!(client.cookies().get(AUTH_TOKEN_COOKIE).is_none());

            let html = client
                .get(uri!(login_form))
                .dispatch()
                .await
                .into_string()
                .await
                .unwrap();
            assert!(html.contains("Invalid Voter ID or Password!"));
        }
    }

    #[backend_test]
    async fn login_unknown_voter(client: Client) {
        let response = submit_login(&client, &Credentials::example()).await;

        assert_eq!(Status::SeeOther, response.status());
        assert_eq!(Some("/login"), location(&response));
        assert!(client.cookies().get(AUTH_TOKEN_COOKIE).is_none());
    }

    #[backend_test]
    async fn login_after_voting(client: Client, db: SqlitePool) {
        submit_registration(&client, &Registration::example()).await;
        let mut conn = db.acquire().await.unwrap();
        crate::model::db::cast_vote(&mut conn, "v1", CandidateId(1))
            .await
            .unwrap();

        let response = submit_login(&client, &Credentials::example()).await;

        assert_eq!(Status::SeeOther, response.status());
        assert_eq!(Some("/already_voted"), location(&response));
        assert!(client.cookies().get(AUTH_TOKEN_COOKIE).is_some());
    }

    #[backend_test(voter)]
    async fn logout_voter(client: Client) {
        let response = client.get(uri!(logout)).dispatch().await;

        assert_eq!(Status::SeeOther, response.status());
        assert_eq!(Some("/"), location(&response));
        assert!(client.cookies().get(AUTH_TOKEN_COOKIE).is_none());

        let response = client.get(uri!(super::super::voting::ballot)).dispatch().await;
        assert_eq!(Some("/login"), location(&response));
    }

    #[backend_test]
    async fn logout_not_logged_in(client: Client) {
        let response = client.get(uri!(logout)).dispatch().await;

        assert_eq!(Status::SeeOther, response.status());
        assert_eq!(Some("/"), location(&response));
    }
}
