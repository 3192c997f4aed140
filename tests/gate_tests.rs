use rental_gateway::{
    Decision, RouteGate, RouteTable,
    models::{CallerIdentity, Role},
};

fn gate() -> RouteGate {
    RouteGate::new(RouteTable::marketplace_default())
}

fn caller(role: Role) -> CallerIdentity {
    CallerIdentity::new(format!("{role}-1"), role)
}

fn login(path: &str) -> Decision {
    Decision::RedirectToLogin {
        redirect_path: path.to_string(),
    }
}

const PUBLIC_PATHS: [&str; 6] = ["/", "/about", "/contact", "/faq", "/listings", "/health"];

const PROTECTED_PATHS: [&str; 7] = [
    "/profile",
    "/change-password",
    "/listings/abc123",
    "/listings/create",
    "/dashboard/admin/user-management",
    "/dashboard/landlord/my-listings",
    "/dashboard/tenant/my-requests",
];

// --- Scenarios ---

#[test]
fn tenant_on_admin_dashboard_is_sent_home() {
    let decision = gate().decide("/dashboard/admin/user-management", Some(&caller(Role::Tenant)));
    assert_eq!(decision, Decision::RedirectToHome);
    assert_eq!(decision.location().as_deref(), Some("/"));
}

#[test]
fn tenant_on_own_dashboard_is_allowed() {
    let decision = gate().decide("/dashboard/tenant/my-requests", Some(&caller(Role::Tenant)));
    assert_eq!(decision, Decision::Allow);
}

#[test]
fn anonymous_create_listing_goes_to_login_with_return_path() {
    let decision = gate().decide("/listings/create", None);
    assert_eq!(decision, login("/listings/create"));
    assert_eq!(
        decision.location().as_deref(),
        Some("/login?redirectPath=/listings/create")
    );
}

#[test]
fn landlord_profile_is_a_common_private_route() {
    assert_eq!(
        gate().decide("/profile", Some(&caller(Role::Landlord))),
        Decision::Allow
    );
}

#[test]
fn anonymous_about_page_is_public() {
    assert_eq!(gate().decide("/about", None), Decision::Allow);
}

// --- Properties ---

#[test]
fn public_paths_are_allowed_for_everyone() {
    let gate = gate();
    for path in PUBLIC_PATHS {
        assert_eq!(gate.decide(path, None), Decision::Allow, "{path} anonymous");
        for role in Role::ALL {
            assert_eq!(
                gate.decide(path, Some(&caller(role))),
                Decision::Allow,
                "{path} as {role}"
            );
        }
    }
}

#[test]
fn anonymous_callers_are_sent_to_login_with_the_exact_path() {
    let gate = gate();
    for path in PROTECTED_PATHS {
        let decision = gate.decide(path, None);
        assert_eq!(decision, login(path));

        let location = decision.location().unwrap();
        let query = location.strip_prefix("/login?").unwrap();
        let pairs: Vec<(String, String)> = serde_urlencoded::from_str(query).unwrap();
        assert_eq!(pairs, vec![("redirectPath".to_string(), path.to_string())]);
    }
}

#[test]
fn redirect_path_survives_special_characters() {
    let path = "/dashboard/tenant/my requests&x";
    let location = gate().decide(path, None).location().unwrap();
    let query = location.strip_prefix("/login?").unwrap();
    let pairs: Vec<(String, String)> = serde_urlencoded::from_str(query).unwrap();
    assert_eq!(pairs, vec![("redirectPath".to_string(), path.to_string())]);
}

#[test]
fn each_role_reaches_its_own_routes_and_nothing_else() {
    let gate = gate();
    let owned = [
        (Role::Admin, "/dashboard/admin/listings"),
        (Role::Landlord, "/dashboard/landlord/requests"),
        (Role::Landlord, "/listings/create"),
        (Role::Tenant, "/dashboard/tenant/payments"),
        (Role::Tenant, "/payment"),
    ];

    for (owner, path) in owned {
        for role in Role::ALL {
            let expected = if role == owner {
                Decision::Allow
            } else {
                Decision::RedirectToHome
            };
            assert_eq!(gate.decide(path, Some(&caller(role))), expected, "{path} as {role}");
        }
    }
}

#[test]
fn common_private_routes_allow_every_role() {
    let gate = gate();
    for role in Role::ALL {
        for path in ["/profile", "/profile/edit", "/change-password"] {
            assert_eq!(gate.decide(path, Some(&caller(role))), Decision::Allow);
        }
    }
}

#[test]
fn listing_detail_needs_any_session() {
    let gate = gate();
    assert_eq!(gate.decide("/listings/42", None), login("/listings/42"));
    for role in Role::ALL {
        assert_eq!(gate.decide("/listings/42", Some(&caller(role))), Decision::Allow);
    }
}

#[test]
fn auth_routes_are_for_anonymous_callers() {
    let gate = gate();
    assert_eq!(gate.decide("/login", None), Decision::Allow);
    assert_eq!(gate.decide("/register", None), Decision::Allow);
    assert_eq!(
        gate.decide("/login", Some(&caller(Role::Tenant))),
        Decision::RedirectToHome
    );
}

#[test]
fn unclassified_routes_default_to_allow() {
    let gate = gate();
    assert_eq!(gate.decide("/terms", None), Decision::Allow);
    assert_eq!(gate.decide("/terms", Some(&caller(Role::Admin))), Decision::Allow);
    // Near-misses of role prefixes are not role routes.
    assert_eq!(
        gate.decide("/dashboard/administrator", Some(&caller(Role::Tenant))),
        Decision::Allow
    );
}

#[test]
fn decisions_are_idempotent() {
    let gate = gate();
    let tenant = caller(Role::Tenant);
    for path in PROTECTED_PATHS.iter().chain(PUBLIC_PATHS.iter()) {
        for identity in [None, Some(&tenant)] {
            assert_eq!(gate.decide(path, identity), gate.decide(path, identity));
        }
    }
}

#[test]
fn custom_table_drives_the_gate() {
    let table = RouteTable::from_json(
        r#"{
            "public": [{ "exact": "/" }],
            "common_private": [{ "prefix": "/account" }],
            "role_routes": {
                "landlord": [{ "pattern": "^/properties/[0-9]+/edit$" }]
            }
        }"#,
    )
    .unwrap();
    let gate = RouteGate::new(table);

    assert_eq!(gate.decide("/account", None), login("/account"));
    assert_eq!(
        gate.decide("/properties/7/edit", Some(&caller(Role::Landlord))),
        Decision::Allow
    );
    assert_eq!(
        gate.decide("/properties/7/edit", Some(&caller(Role::Admin))),
        Decision::RedirectToHome
    );
    // No dashboard rules in this table, so dashboards fall through to default-allow.
    assert_eq!(gate.decide("/dashboard/admin", None), Decision::Allow);
}
