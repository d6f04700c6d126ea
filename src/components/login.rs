//! Login Screen
//!
//! Password sign-in, phone OTP and registration tabs.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::{auth, CancelToken};
use crate::components::common::{ErrorBanner, SuccessBanner};
use crate::context::use_session;
use crate::models::{OtpPurpose, RegisterForm};

#[derive(Clone, Copy, PartialEq)]
enum LoginTab {
    Password,
    Otp,
    Register,
}

#[derive(Clone, Copy, PartialEq)]
enum OtpStep {
    Phone,
    Code,
}

#[component]
pub fn Login() -> impl IntoView {
    let ctx = use_session();
    let (tab, set_tab) = signal(LoginTab::Password);
    let (busy, set_busy) = signal(false);
    let error = RwSignal::new(None::<String>);
    let notice = RwSignal::new(None::<String>);

    // Password
    let (identifier, set_identifier) = signal(String::new());
    let (password, set_password) = signal(String::new());

    // OTP
    let (phone, set_phone) = signal(String::new());
    let (code, set_code) = signal(String::new());
    let (otp_step, set_otp_step) = signal(OtpStep::Phone);

    // Register
    let form = RwSignal::new(RegisterForm::default());

    let switch_tab = move |next: LoginTab| {
        set_tab.set(next);
        error.set(None);
        notice.set(None);
    };

    let submit_password = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        set_busy.set(true);
        error.set(None);
        let client = ctx.client();
        let (id, pass) = (identifier.get(), password.get());
        spawn_local(async move {
            match auth::login(&client, &id, &pass, &CancelToken::new()).await {
                Ok(session) => ctx.signed_in(session),
                Err(e) => error.set(Some(e.user_message("Error al iniciar sesión"))),
            }
            set_busy.set(false);
        });
    };

    let submit_otp = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        set_busy.set(true);
        error.set(None);
        let client = ctx.client();
        let number = phone.get();
        match otp_step.get() {
            OtpStep::Phone => spawn_local(async move {
                match auth::request_otp(&client, &number, OtpPurpose::Login, &CancelToken::new()).await {
                    Ok(sent) => {
                        let text = match sent.debug_code {
                            Some(code) => format!("Código OTP enviado: {} (solo desarrollo)", code),
                            None => format!("Código OTP enviado a {}", number),
                        };
                        notice.set(Some(text));
                        set_otp_step.set(OtpStep::Code);
                    }
                    Err(e) => error.set(Some(e.user_message("Error enviando OTP"))),
                }
                set_busy.set(false);
            }),
            OtpStep::Code => {
                let entered = code.get();
                spawn_local(async move {
                    match auth::verify_otp(&client, &number, &entered, OtpPurpose::Login, &CancelToken::new()).await {
                        Ok(session) => ctx.signed_in(session),
                        Err(e) => error.set(Some(e.user_message("Código OTP inválido"))),
                    }
                    set_busy.set(false);
                });
            }
        }
    };

    let submit_register = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        set_busy.set(true);
        error.set(None);
        let client = ctx.client();
        let data = form.get();
        spawn_local(async move {
            match auth::register(&client, &data, &CancelToken::new()).await {
                Ok(session) => ctx.signed_in(session),
                Err(e) => error.set(Some(e.user_message("Error en el registro"))),
            }
            set_busy.set(false);
        });
    };

    let tab_class = move |t: LoginTab| if tab.get() == t { "tab active" } else { "tab" };

    view! {
        <div class="login-screen">
            <div class="login-card">
                <h1 class="login-title">"🗂️ Gestión de Residuos"</h1>
                <p class="login-subtitle">"EPAGAL Latacunga"</p>

                <div class="tabs">
                    <button class=move || tab_class(LoginTab::Password) on:click=move |_| switch_tab(LoginTab::Password)>"Iniciar Sesión"</button>
                    <button class=move || tab_class(LoginTab::Otp) on:click=move |_| switch_tab(LoginTab::Otp)>"OTP"</button>
                    <button class=move || tab_class(LoginTab::Register) on:click=move |_| switch_tab(LoginTab::Register)>"Registro"</button>
                </div>

                <ErrorBanner message=error on_dismiss=move |_| error.set(None) />
                <SuccessBanner message=notice />

                {move || match tab.get() {
                    LoginTab::Password => view! {
                        <form class="form" on:submit=submit_password>
                            <label>"Email o Teléfono"
                                <input type="text" required prop:value=identifier
                                    on:input=move |ev| set_identifier.set(event_target_value(&ev)) />
                            </label>
                            <label>"Contraseña"
                                <input type="password" required prop:value=password
                                    on:input=move |ev| set_password.set(event_target_value(&ev)) />
                            </label>
                            <button type="submit" class="btn btn-primary" disabled=busy>
                                {move || if busy.get() { "Ingresando..." } else { "Iniciar Sesión" }}
                            </button>
                        </form>
                    }.into_any(),
                    LoginTab::Otp => view! {
                        <form class="form" on:submit=submit_otp>
                            <label>"Número de Teléfono"
                                <input type="tel" required placeholder="+593..." prop:value=phone
                                    disabled=move || otp_step.get() == OtpStep::Code
                                    on:input=move |ev| set_phone.set(event_target_value(&ev)) />
                            </label>
                            <Show when=move || otp_step.get() == OtpStep::Code>
                                <label>"Código OTP"
                                    <input type="text" required inputmode="numeric" prop:value=code
                                        on:input=move |ev| set_code.set(event_target_value(&ev)) />
                                </label>
                            </Show>
                            <button type="submit" class="btn btn-primary" disabled=busy>
                                {move || match otp_step.get() {
                                    OtpStep::Phone => "Enviar Código",
                                    OtpStep::Code => "Verificar",
                                }}
                            </button>
                            <Show when=move || otp_step.get() == OtpStep::Code>
                                <button type="button" class="btn btn-text" on:click=move |_| {
                                    set_otp_step.set(OtpStep::Phone);
                                    set_code.set(String::new());
                                    notice.set(None);
                                }>"Cambiar número"</button>
                            </Show>
                        </form>
                    }.into_any(),
                    LoginTab::Register => view! {
                        <form class="form" on:submit=submit_register>
                            <label>"Email"
                                <input type="email" required prop:value=move || form.with(|f| f.email.clone())
                                    on:input=move |ev| form.update(|f| f.email = event_target_value(&ev)) />
                            </label>
                            <label>"Teléfono"
                                <input type="tel" prop:value=move || form.with(|f| f.phone.clone())
                                    on:input=move |ev| form.update(|f| f.phone = event_target_value(&ev)) />
                            </label>
                            <div class="form-row">
                                <label>"Nombre"
                                    <input type="text" prop:value=move || form.with(|f| f.first_name.clone())
                                        on:input=move |ev| form.update(|f| f.first_name = event_target_value(&ev)) />
                                </label>
                                <label>"Apellido"
                                    <input type="text" prop:value=move || form.with(|f| f.last_name.clone())
                                        on:input=move |ev| form.update(|f| f.last_name = event_target_value(&ev)) />
                                </label>
                            </div>
                            <label>"Contraseña"
                                <input type="password" required prop:value=move || form.with(|f| f.password.clone())
                                    on:input=move |ev| form.update(|f| f.password = event_target_value(&ev)) />
                            </label>
                            <label>"Confirmar Contraseña"
                                <input type="password" required prop:value=move || form.with(|f| f.password_confirm.clone())
                                    on:input=move |ev| form.update(|f| f.password_confirm = event_target_value(&ev)) />
                            </label>
                            <button type="submit" class="btn btn-primary" disabled=busy>"Registrarse"</button>
                        </form>
                    }.into_any(),
                }}
            </div>
        </div>
    }
}
