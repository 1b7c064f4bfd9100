//! Screen controllers over the fixture backend with stand-in device capabilities.

use async_trait::async_trait;
use service_finder::api::{FixtureApi, FixtureData};
use service_finder::device::{
    AuthSession, Authenticator, Capabilities, ContactIntent, Coordinates, FixedLocation, LoggingLauncher,
    QueuedImagePicker, ReverseGeocoder, User, PERMISSION_DENIED_MESSAGE,
};
use service_finder::domain::MISSING_FIELDS_MESSAGE;
use service_finder::screens::{
    AddReviewScreen, AddServiceScreen, CategoryScreen, DetailBody, DetailScreen, HomeScreen, ListBody,
    ProfileScreen, DETAIL_FAILED_MESSAGE, REVIEW_THANKS_MESSAGE, SERVICE_ADDED_MESSAGE,
};
use service_finder::search::SearchFilter;
use service_finder::{CompletionPolicy, Result, ServiceFinderError, Store};
use std::sync::Arc;

struct FixedCity(Option<&'static str>);

#[async_trait]
impl ReverseGeocoder for FixedCity {
    async fn city(&self, _position: &Coordinates) -> Result<Option<String>> {
        Ok(self.0.map(str::to_string))
    }
}

struct LocalAuth;

#[async_trait]
impl Authenticator for LocalAuth {
    async fn register(&self, email: &str, _password: &str) -> Result<User> {
        Ok(User {
            uid: "uid-local".into(),
            email: email.into(),
            id_token: String::new(),
        })
    }

    async fn login(&self, email: &str, password: &str) -> Result<User> {
        if password == "secret" {
            self.register(email, password).await
        } else {
            Err(ServiceFinderError::Auth("INVALID_PASSWORD".into()))
        }
    }

    async fn logout(&self) -> Result<()> {
        Ok(())
    }
}

struct Harness {
    store: Arc<Store<FixtureApi>>,
    launcher: Arc<LoggingLauncher>,
    picker: Arc<QueuedImagePicker>,
    caps: Capabilities,
}

fn harness(location: FixedLocation) -> Harness {
    let data: FixtureData = serde_json::from_str(
        r#"{
            "services": [
                {"service_id": 1, "name": "Plumbing Fix", "category": "plumbing", "city": "Pune", "price": "300"},
                {"service_id": 2, "name": "Pipe Repair", "category": "plumbing", "city": "Mumbai", "price": "450"},
                {"service_id": 3, "name": "House Cleaning", "category": "cleaning", "city": "Pune", "price": "900"}
            ],
            "reviews": [
                {"service_id": 1, "review_id": 1, "rating": "4", "review_text": "Quick"},
                {"service_id": 1, "review_id": 2, "rating": "4", "review_text": "Tidy"}
            ]
        }"#,
    )
    .unwrap();

    let store = Arc::new(Store::new(FixtureApi::new(data), CompletionPolicy::default()));
    let launcher = Arc::new(LoggingLauncher::default());
    let picker = Arc::new(QueuedImagePicker::default());
    let caps = Capabilities {
        location: Arc::new(location),
        geocoder: Arc::new(FixedCity(Some("Pune"))),
        images: picker.clone(),
        launcher: launcher.clone(),
        auth: Arc::new(AuthSession::new(Arc::new(LocalAuth))),
    };

    Harness {
        store,
        launcher,
        picker,
        caps,
    }
}

fn in_pune() -> FixedLocation {
    FixedLocation::granted(Coordinates::new(18.52, 73.85))
}

#[tokio::test]
async fn home_shows_city_and_marks_nearby_listings() {
    let h = harness(in_pune());
    let mut home = HomeScreen::new(h.store.clone(), h.caps.clone(), SearchFilter::default());
    home.mount().await.unwrap();

    let view = home.view().unwrap();
    assert_eq!(view.city.as_deref(), Some("Pune"));
    assert_eq!(view.categories.len(), 5);
    let nearby: Vec<i64> = view
        .body
        .cards()
        .iter()
        .filter(|c| c.is_nearby)
        .map(|c| c.service_id)
        .collect();
    assert_eq!(nearby, vec![1, 3]);
    assert_eq!(home.position().map(|p| p.latitude.as_str()), Some("18.52"));
}

#[tokio::test]
async fn home_without_permission_alerts_and_still_lists() {
    let h = harness(FixedLocation::denied());
    let mut home = HomeScreen::new(h.store.clone(), h.caps.clone(), SearchFilter::default());
    home.mount().await.unwrap();

    assert_eq!(h.store.take_alerts().unwrap(), vec![PERMISSION_DENIED_MESSAGE.to_string()]);
    let view = home.view().unwrap();
    assert_eq!(view.city, None);
    assert_eq!(view.body.cards().len(), 3);
}

#[tokio::test]
async fn home_search_narrows_and_empties() {
    let h = harness(in_pune());
    let mut home = HomeScreen::new(h.store.clone(), h.caps.clone(), SearchFilter::default());
    home.mount().await.unwrap();

    home.set_query("cleaning");
    assert_eq!(home.view().unwrap().body.cards().len(), 1);

    home.set_query("xyz123notfound");
    assert_eq!(
        home.view().unwrap().body,
        ListBody::Empty("No services found".to_string())
    );
}

#[tokio::test]
async fn category_screen_waits_for_its_own_category() {
    let h = harness(in_pune());
    let plumbing = CategoryScreen::new(h.store.clone(), SearchFilter::default(), "plumbing");
    let cleaning = CategoryScreen::new(h.store.clone(), SearchFilter::default(), "cleaning");

    assert_eq!(plumbing.view().unwrap().body, ListBody::Loading);

    plumbing.mount().await.unwrap();
    let view = plumbing.view().unwrap();
    assert_eq!(view.title, "Plumbing");
    assert_eq!(view.body.cards().len(), 2);
    assert_eq!(cleaning.view().unwrap().body, ListBody::Loading);

    cleaning.refresh().await.unwrap();
    assert_eq!(cleaning.view().unwrap().body.cards().len(), 1);
    assert!(!h.store.read(|s| s.services.is_requested()).unwrap());
}

#[tokio::test]
async fn detail_combines_service_reviews_and_related() {
    let h = harness(in_pune());
    let detail = DetailScreen::new(h.store.clone(), h.caps.clone(), 1);
    detail.mount().await.unwrap();

    let DetailBody::Loaded(service) = detail.view().unwrap().body else {
        panic!("detail not loaded");
    };
    assert_eq!(service.name, "Plumbing Fix");
    assert_eq!(service.category, "Plumbing");
    assert_eq!(service.average_rating, "4.0");
    assert_eq!(service.review_count, 2);
    assert_eq!(service.reviews[0].stars, [true, true, true, true, false]);
    assert_eq!(
        service.related.iter().map(|c| c.service_id).collect::<Vec<_>>(),
        vec![2]
    );

    detail.contact(&ContactIntent::Call("+911234567890".into()));
    assert_eq!(h.launcher.launched(), vec!["tel:+911234567890".to_string()]);
}

#[tokio::test]
async fn detail_of_missing_service_fails() {
    let h = harness(in_pune());
    let detail = DetailScreen::new(h.store.clone(), h.caps.clone(), 42);
    detail.mount().await.unwrap();

    assert_eq!(
        detail.view().unwrap().body,
        DetailBody::Failed(DETAIL_FAILED_MESSAGE.to_string())
    );
}

#[tokio::test]
async fn add_service_prefills_submits_and_resets() {
    let h = harness(in_pune());
    let mut screen = AddServiceScreen::new(h.store.clone(), h.caps.clone());
    screen.mount().await;
    assert_eq!(screen.form.city, "Pune");
    assert_eq!(screen.form.longitude, "73.85");

    screen.form.name = "Garden Care".into();
    screen.form.description = "Lawn mowing".into();
    screen.form.price = "600".into();
    screen.form.category = "other".into();

    let err = screen.submit().await.unwrap_err();
    assert_eq!(err.to_string(), MISSING_FIELDS_MESSAGE);
    assert_eq!(screen.form.name, "Garden Care");

    h.picker.push(vec!["file:///lawn-1.jpg".into(), "file:///lawn-2.jpg".into()]);
    h.picker.push(vec!["file:///lawn-3.jpg".into()]);
    screen.pick_images().await.unwrap();
    screen.pick_images().await.unwrap();
    assert_eq!(screen.form.images.len(), 3);

    let created = screen.submit().await.unwrap();
    assert_eq!(created.service_id, 4);
    assert_eq!(created.city, "Pune");
    assert_eq!(created.image_urls.len(), 3);
    assert!(screen.form.name.is_empty());
    assert!(screen.form.images.is_empty());
    assert_eq!(screen.form.city, "Pune");

    assert_eq!(
        h.store.take_alerts().unwrap(),
        vec![MISSING_FIELDS_MESSAGE.to_string(), SERVICE_ADDED_MESSAGE.to_string()]
    );
}

#[tokio::test]
async fn add_review_thanks_and_reloads_reviews() {
    let h = harness(in_pune());
    let mut screen = AddReviewScreen::new(h.store.clone(), h.caps.clone(), 3);

    let err = screen.submit().await.unwrap_err();
    assert!(matches!(err, ServiceFinderError::Validation(_)));
    h.store.take_alerts().unwrap();

    screen.set_rating(9);
    assert_eq!(screen.rating(), 5);
    assert_eq!(screen.view().rating_label, Some("Great"));
    screen.review_text = "Spotless".into();

    let review = screen.submit().await.unwrap();
    assert_eq!(review.rating, "5");
    assert_eq!(h.store.take_alerts().unwrap(), vec![REVIEW_THANKS_MESSAGE.to_string()]);

    let state = h.store.snapshot().unwrap();
    assert_eq!(state.reviews_service_id, Some(3));
    assert_eq!(state.reviews.data.len(), 1);
    assert!((state.average_rating() - 5.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn profile_follows_session() {
    let h = harness(in_pune());
    let profile = ProfileScreen::new(h.caps.auth.clone());
    assert!(!profile.view().await.signed_in);

    profile.login("ana@example.com", "wrong").await.unwrap_err();
    assert!(!profile.view().await.signed_in);

    profile.login("ana@example.com", "secret").await.unwrap();
    let view = profile.view().await;
    assert!(view.signed_in);
    assert_eq!(view.email.as_deref(), Some("ana@example.com"));

    profile.logout().await.unwrap();
    assert!(!profile.view().await.signed_in);
}
