// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

#[cfg(test)]
mod render_tests {
    //! # 页面渲染集成测试
    //!
    //! 使用临时目录中的真实模板文件，模拟一次完整的请求处理：
    //! 1. 从请求路径中解析路由段，决定渲染哪个模板。
    //! 2. 根据会话状态渲染共享页头。
    //! 3. 渲染正文并检查拼接结果与转义行为。

    use std::cell::Cell;
    use std::fs;

    use site_helpers::{
        request, Config, Exception, Link, PageData, PageRenderer, RequestContext, User,
    };
    use tempfile::TempDir;

    const HEADER: &str = r#"<nav>
{{- if .IsUserLoggedIn }}<span class="user">{{ .DisplayName }}</span><a href="/logout">Log out</a>
{{- else }}<a href="/login">Log in</a>
{{- end }}</nav>
"#;

    const PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
<title>{{ .Title }}</title>
{{- range .StyleSrc }}
<link rel="stylesheet" href="{{ .Path }}">
{{- end }}
{{- range .ScriptSrc }}
<script src="{{ .Path }}"{{ if .Attributes.defer }} defer{{ end }}></script>
{{- end }}
</head>
<body>{{ .Body }}</body>
</html>
"#;

    /// 简单的会话替身，记录用户查询次数。
    struct FakeSession {
        logged_in: bool,
        user: Option<User>,
        lookups: Cell<u32>,
    }

    impl FakeSession {
        fn anonymous() -> Self {
            Self {
                logged_in: false,
                user: None,
                lookups: Cell::new(0),
            }
        }

        fn with_user(name: &str) -> Self {
            Self {
                logged_in: true,
                user: Some(User {
                    id: 42,
                    display_name: name.to_string(),
                }),
                lookups: Cell::new(0),
            }
        }

        fn with_broken_store() -> Self {
            Self {
                logged_in: true,
                user: None,
                lookups: Cell::new(0),
            }
        }
    }

    impl RequestContext for FakeSession {
        fn is_user_logged_in(&self) -> bool {
            self.logged_in
        }

        fn user_id(&self) -> u64 {
            42
        }

        fn get_user(&self, id: u64) -> Result<User, Exception> {
            self.lookups.set(self.lookups.get() + 1);
            self.user
                .clone()
                .ok_or_else(|| Exception::UserLookupFailed(format!("user {} unavailable", id)))
        }
    }

    fn site() -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("header.template"), HEADER).unwrap();
        fs::write(dir.path().join("page.template"), PAGE).unwrap();
        fs::create_dir(dir.path().join("errors")).unwrap();
        fs::write(dir.path().join("errors").join("broken.template"), "{{ if .X }}").unwrap();
        dir
    }

    fn renderer(dir: &TempDir) -> PageRenderer<site_helpers::FileTemplateProvider> {
        let config = Config::from_toml_str(&format!(
            "template_root = {:?}\nheader_template = \"header.template\"",
            dir.path().to_str().unwrap()
        ));
        PageRenderer::from_config(&config)
    }

    fn page() -> PageData {
        PageData::new(
            "Profile & Settings",
            "<section><h1>Profile</h1></section>",
            vec![Link::new("/static/site.css")],
            vec![
                Link::new("/static/app.js").with_attribute("defer", "true"),
                Link::new("/static/inline.js"),
            ],
        )
    }

    #[test]
    fn test_anonymous_page() {
        let dir = site();
        let session = FakeSession::anonymous();
        let html = renderer(&dir)
            .render_with_header("page.template", &page(), &session)
            .unwrap();

        assert!(html.starts_with("<nav><a href=\"/login\">Log in</a></nav>\n<!DOCTYPE html>"));
        assert!(html.contains("<title>Profile &amp; Settings</title>"));
        assert!(html.contains("<link rel=\"stylesheet\" href=\"/static/site.css\">"));
        assert!(html.contains("<script src=\"/static/app.js\" defer></script>"));
        assert!(html.contains("<script src=\"/static/inline.js\"></script>"));
        assert!(html.contains("<body><section><h1>Profile</h1></section></body>"));
        assert_eq!(session.lookups.get(), 0);
    }

    #[test]
    fn test_logged_in_page_escapes_name() {
        let dir = site();
        let session = FakeSession::with_user("<script>alert(1)</script>");
        let html = renderer(&dir)
            .render_with_header("page.template", &page(), &session)
            .unwrap();

        assert!(html.starts_with(
            "<nav><span class=\"user\">&lt;script&gt;alert(1)&lt;/script&gt;</span>"
        ));
        assert!(html.contains("<a href=\"/logout\">Log out</a></nav>"));
        assert_eq!(session.lookups.get(), 1);
    }

    #[test]
    fn test_broken_user_store_still_renders() {
        let dir = site();
        let session = FakeSession::with_broken_store();
        let html = renderer(&dir)
            .render_with_header("page.template", &page(), &session)
            .unwrap();

        assert!(html.starts_with("<nav><span class=\"user\"></span><a href=\"/logout\">"));
        assert_eq!(session.lookups.get(), 1);
    }

    #[test]
    fn test_route_selects_template() {
        let dir = site();
        let session = FakeSession::anonymous();
        let path = "/settings/page?tab=profile";

        let template_id = format!("{}.template", request::last_route(path));
        assert_eq!(request::routes(path), vec!["settings", "page"]);
        assert_eq!(
            request::query_params(path).get("tab").unwrap(),
            &vec!["profile".to_string()]
        );

        let html = renderer(&dir)
            .render_with_header(&template_id, &page(), &session)
            .unwrap();
        assert!(html.contains("<title>Profile &amp; Settings</title>"));
    }

    #[test]
    fn test_missing_template() {
        let dir = site();
        let err = renderer(&dir)
            .render_with_header("missing.template", &page(), &FakeSession::anonymous())
            .unwrap_err();
        assert_eq!(err, Exception::TemplateNotFound("missing.template".to_string()));
        assert!(err.is_template_error());
    }

    #[test]
    fn test_broken_template() {
        let dir = site();
        let err = renderer(&dir)
            .render("errors/broken.template", &page())
            .unwrap_err();
        assert!(matches!(err, Exception::TemplateSyntax(_)));
        assert!(!err.public_message().contains("broken"));
    }

    #[test]
    fn test_missing_header_short_circuits() {
        let dir = site();
        fs::remove_file(dir.path().join("header.template")).unwrap();
        let session = FakeSession::with_user("ann");
        let err = renderer(&dir)
            .render_with_header("page.template", &page(), &session)
            .unwrap_err();
        assert_eq!(err, Exception::TemplateNotFound("header.template".to_string()));
    }

    #[test]
    fn test_template_edits_are_picked_up() {
        let dir = site();
        let renderer = renderer(&dir);
        fs::write(dir.path().join("hello.template"), "v1 {{.}}").unwrap();
        assert_eq!(renderer.render("hello.template", "x").unwrap(), "v1 x");
        fs::write(dir.path().join("hello.template"), "v2 {{.}}").unwrap();
        assert_eq!(renderer.render("hello.template", "x").unwrap(), "v2 x");
    }
}
