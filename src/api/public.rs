use rocket::{request::FlashMessage, response::content::RawHtml, Route};

use crate::error::Result;
use crate::model::{db::Candidate, sqlite::Db};
use crate::view;

pub fn routes() -> Vec<Route> {
    routes![index, results, thank_you, already_voted]
}

#[get("/")]
pub fn index(flash: Option<FlashMessage<'_>>) -> RawHtml<String> {
    view::index(flash)
}

/// The public tally, most votes first.
#[get("/results")]
pub async fn results(mut db: Db) -> Result<RawHtml<String>> {
    let candidates = Candidate::by_votes(&mut db).await?;
    Ok(view::results(&candidates))
}

#[get("/thankyou")]
pub fn thank_you() -> RawHtml<String> {
    view::thank_you()
}

#[get("/already_voted")]
pub fn already_voted() -> RawHtml<String> {
    view::already_voted()
}

#[cfg(test)]
mod tests {
    use rocket::{http::Status, local::asynchronous::Client};
    use sqlx::SqlitePool;

    use super::*;

    #[backend_test]
    async fn landing_page(client: Client) {
        let response = client.get(uri!(index)).dispatch().await;

        assert_eq!(Status::Ok, response.status());
        let html = response.into_string().await.unwrap();
        assert!(html.contains("Online Voting System"));
        assert!(html.matches("<a ").count() >= 3);
    }

    #[backend_test]
    async fn results_need_no_login(client: Client) {
        let response = client.get(uri!(results)).dispatch().await;

        assert_eq!(Status::Ok, response.status());
        let html = response.into_string().await.unwrap();
        assert!(html.contains("Results"));
        assert_eq!(html.matches("candidate-card").count(), 3);
    }

    #[backend_test]
    async fn results_sorted_by_votes(client: Client, db: SqlitePool) {
        sqlx::query("UPDATE candidates SET votes = 7 WHERE name = 'Candidate C'")
            .execute(&db)
            .await
            .unwrap();

        let html = client
            .get(uri!(results))
            .dispatch()
            .await
            .into_string()
            .await
            .unwrap();

        let c = html.find("Candidate C").unwrap();
        let a = html.find("Candidate A").unwrap();
        let b = html.find("Candidate B").unwrap();
        assert!(c < a && a < b);
        assert!(html.contains("<strong>7</strong>"));
    }

    #[backend_test]
    async fn confirmation_pages(client: Client) {
        let response = client.get(uri!(thank_you)).dispatch().await;
        assert_eq!(Status::Ok, response.status());
        assert!(response.into_string().await.unwrap().contains("Thank"));

        let response = client.get(uri!(already_voted)).dispatch().await;
        assert_eq!(Status::Ok, response.status());
        assert!(response
            .into_string()
            .await
            .unwrap()
            .to_lowercase()
            .contains("already"));
    }

    #[backend_test]
    async fn stylesheet_is_served(client: Client) {
        let response = client.get("/static/style.css").dispatch().await;

        assert_eq!(Status::Ok, response.status());
        assert!(response.into_string().await.unwrap().contains("body"));
    }
}
