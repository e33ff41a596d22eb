// ============================================================================
// APP SHELL — mode routing, editor chrome, background job plumbing
// ============================================================================

use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;

use eframe::egui;
use image::RgbaImage;

use crate::assets::AppSettings;
use crate::components::chat::ChatScreen;
use crate::components::editor::EditorView;
use crate::components::history::HistoryPanel;
use crate::components::layers::{self, LayersPanel};
use crate::components::properties::PropertiesPanel;
use crate::document::{Document, ImageRef, Layer, ReorderDirection, ShapeKind};
use crate::ops::ai::{self, DesignService, GeminiClient, GenerationResult};
use crate::ops::export;
use crate::ops::templates;
use crate::project::EditorProject;
use crate::{log_err, log_info, log_warn};

/// Default edge length for uploaded images.
const UPLOAD_LAYER_SIZE: f32 = 300.0;
/// Default edge length for generated logos.
const LOGO_LAYER_SIZE: f32 = 400.0;

const EMOJI: [&str; 18] = [
    "🔥", "⭐", "💡", "🎯", "🚀", "💰", "🎉", "❤", "👍", "😂", "😱", "🤩", "✅", "⚡", "🏆",
    "📈", "🎮", "🎵",
];

/// Top-level surface the window is showing.
#[derive(Clone, Copy, PartialEq, Eq)]
enum AppMode {
    Home,
    Chat,
    Editor,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum SidebarTab {
    Add,
    Uploads,
    AiTools,
    Templates,
    Layers,
}

/// Result delivered from a background upload-decode thread.
enum UploadResult {
    Loaded { name: String, pixels: RgbaImage },
    Failed(String),
}

/// Result delivered from a background export thread.
enum ExportResult {
    Saved(PathBuf),
    Failed(String),
}

pub struct CreoApp {
    mode: AppMode,
    settings: AppSettings,
    service: Arc<dyn DesignService>,

    chat: ChatScreen,

    project: EditorProject,
    editor: EditorView,
    layers_panel: LayersPanel,
    properties_panel: PropertiesPanel,
    history_panel: HistoryPanel,
    sidebar_tab: SidebarTab,

    // Add-text input
    text_input: String,

    // AI tools
    ai_prompt: String,
    logo_prompt: String,
    ai_error: Option<String>,
    generation_rx: Option<Receiver<GenerationResult>>,

    upload_rx: Option<Receiver<UploadResult>>,
    export_rx: Option<Receiver<ExportResult>>,
    status_line: Option<String>,

    show_settings: bool,
    settings_draft: AppSettings,
}

impl CreoApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, settings: AppSettings) -> Self {
        let service: Arc<dyn DesignService> = Arc::new(GeminiClient::new(
            settings.api_key.clone(),
            settings.model.clone(),
        ));
        log_info!("app started (model: {})", settings.model);
        Self {
            mode: AppMode::Home,
            settings_draft: settings.clone(),
            settings,
            service,
            chat: ChatScreen::new(),
            project: EditorProject::new(Document::blank(
                crate::document::DEFAULT_WIDTH,
                crate::document::DEFAULT_HEIGHT,
            )),
            editor: EditorView::new(),
            layers_panel: LayersPanel::default(),
            properties_panel: PropertiesPanel::default(),
            history_panel: HistoryPanel::default(),
            sidebar_tab: SidebarTab::Add,
            text_input: String::new(),
            ai_prompt: String::new(),
            logo_prompt: String::new(),
            ai_error: None,
            generation_rx: None,
            upload_rx: None,
            export_rx: None,
            status_line: None,
            show_settings: false,
        }
    }

    // ------------------------------------------------------------------------
    // background job completion
    // ------------------------------------------------------------------------

    fn poll_jobs(&mut self) {
        if let Some(rx) = &self.generation_rx
            && let Ok(result) = rx.try_recv()
        {
            self.generation_rx = None;
            match result {
                GenerationResult::Layout(Ok(doc)) => {
                    self.ai_error = None;
                    self.project.replace_document(doc, t!("history.ai_layout"));
                    self.editor.request_fit();
                    log_info!("ai layout applied");
                }
                GenerationResult::Layout(Err(e)) => {
                    log_warn!("ai layout failed: {}", e);
                    self.ai_error = Some(e.to_string());
                }
                GenerationResult::Logo(Ok(pixels)) => {
                    self.ai_error = None;
                    let doc = self.project.document.with_image_layer(
                        &t!("layer.logo_name"),
                        ImageRef::new(pixels),
                        LOGO_LAYER_SIZE,
                        false,
                    );
                    self.project.commit(doc, t!("history.ai_logo"));
                }
                GenerationResult::Logo(Err(e)) => {
                    log_warn!("logo generation failed: {}", e);
                    self.ai_error = Some(e.to_string());
                }
            }
        }

        if let Some(rx) = &self.upload_rx
            && let Ok(result) = rx.try_recv()
        {
            self.upload_rx = None;
            match result {
                UploadResult::Loaded { name, pixels } => {
                    let doc = self.project.document.with_image_layer(
                        &name,
                        ImageRef::new(pixels),
                        UPLOAD_LAYER_SIZE,
                        false,
                    );
                    self.project.commit(doc, t!("history.add_image"));
                }
                UploadResult::Failed(e) => {
                    log_warn!("upload failed: {}", e);
                    self.status_line = Some(e);
                }
            }
        }

        if let Some(rx) = &self.export_rx
            && let Ok(result) = rx.try_recv()
        {
            self.export_rx = None;
            match result {
                ExportResult::Saved(path) => {
                    log_info!("exported {}", path.display());
                    self.status_line = Some(t!("export.saved", path = path.display()));
                }
                ExportResult::Failed(e) => {
                    log_err!("export failed: {}", e);
                    self.status_line = Some(e);
                }
            }
        }
    }

    fn jobs_pending(&self) -> bool {
        self.generation_rx.is_some() || self.upload_rx.is_some() || self.export_rx.is_some()
    }

    fn start_upload(&mut self) {
        if self.upload_rx.is_some() {
            return;
        }
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Images", &["png", "jpg", "jpeg", "webp"])
            .pick_file()
        else {
            return;
        };
        let (tx, rx) = mpsc::channel();
        self.upload_rx = Some(rx);
        std::thread::spawn(move || {
            let name = path
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_else(|| "Image".to_string());
            let result = match image::open(&path) {
                Ok(img) => UploadResult::Loaded {
                    name,
                    pixels: img.to_rgba8(),
                },
                Err(e) => UploadResult::Failed(format!("{}: {}", path.display(), e)),
            };
            let _ = tx.send(result);
        });
    }

    fn start_export(&mut self) {
        if self.export_rx.is_some() {
            return;
        }
        let Some(path) = rfd::FileDialog::new()
            .set_file_name(export::default_export_filename())
            .add_filter("PNG", &["png"])
            .save_file()
        else {
            return;
        };
        let document = self.project.document.clone();
        let (tx, rx) = mpsc::channel();
        self.export_rx = Some(rx);
        std::thread::spawn(move || {
            let result = match export::export_png(&document, &path) {
                Ok(()) => ExportResult::Saved(path),
                Err(e) => ExportResult::Failed(e.to_string()),
            };
            let _ = tx.send(result);
        });
    }

    // ------------------------------------------------------------------------
    // surfaces
    // ------------------------------------------------------------------------

    fn show_home(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(ui.available_height() * 0.25);
                ui.heading(t!("home.title"));
                ui.label(t!("home.subtitle"));
                ui.add_space(24.0);
                ui.horizontal(|ui| {
                    ui.add_space(ui.available_width() / 2.0 - 220.0);
                    if home_card(ui, &t!("home.chat_title"), &t!("home.chat_blurb")) {
                        self.mode = AppMode::Chat;
                    }
                    ui.add_space(16.0);
                    if home_card(ui, &t!("home.editor_title"), &t!("home.editor_blurb")) {
                        self.mode = AppMode::Editor;
                    }
                });
            });
        });
    }

    fn show_chat(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            self.chat.show(ui, &self.service);
        });
    }

    fn show_editor(&mut self, ctx: &egui::Context) {
        self.editor_toolbar(ctx);
        self.editor_sidebar(ctx);

        egui::SidePanel::right("inspector")
            .default_width(260.0)
            .show(ctx, |ui| {
                self.properties_panel.show(ui, &mut self.project);
                ui.separator();
                self.history_panel.show(ui, &self.project.history);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.editor.show(ui, &mut self.project);
        });

        self.handle_editor_shortcuts(ctx);
    }

    fn editor_toolbar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button(t!("nav.home")).clicked() {
                    self.mode = AppMode::Home;
                }
                ui.separator();

                let can_undo = self.project.history.can_undo();
                if ui
                    .add_enabled(can_undo, egui::Button::new(t!("toolbar.undo")))
                    .clicked()
                {
                    self.project.undo();
                }
                let can_redo = self.project.history.can_redo();
                if ui
                    .add_enabled(can_redo, egui::Button::new(t!("toolbar.redo")))
                    .clicked()
                {
                    self.project.redo();
                }
                ui.separator();

                if ui.button("−").clicked() {
                    self.editor.zoom_out();
                }
                ui.label(t!("toolbar.zoom_pct", pct = (self.editor.zoom * 100.0).round()));
                if ui.button("+").clicked() {
                    self.editor.zoom_in();
                }
                if ui.button(t!("toolbar.fit")).clicked() {
                    self.editor.request_fit();
                }
                ui.separator();

                let has_selection = self.project.document.selected_layer().is_some();
                if ui
                    .add_enabled(has_selection, egui::Button::new(t!("toolbar.forward")))
                    .clicked()
                {
                    layers::reorder_selected(&mut self.project, ReorderDirection::Forward);
                }
                if ui
                    .add_enabled(has_selection, egui::Button::new(t!("toolbar.backward")))
                    .clicked()
                {
                    layers::reorder_selected(&mut self.project, ReorderDirection::Backward);
                }
                ui.separator();

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button(t!("toolbar.settings")).clicked() {
                        self.settings_draft = self.settings.clone();
                        self.show_settings = true;
                    }
                    let exporting = self.export_rx.is_some();
                    if ui
                        .add_enabled(!exporting, egui::Button::new(t!("toolbar.export")))
                        .clicked()
                    {
                        self.start_export();
                    }
                    if exporting {
                        ui.spinner();
                    }
                    if let Some(status) = &self.status_line {
                        ui.weak(status);
                    }
                });
            });
        });
    }

    fn editor_sidebar(&mut self, ctx: &egui::Context) {
        egui::SidePanel::left("sidebar").default_width(280.0).show(ctx, |ui| {
            ui.horizontal_wrapped(|ui| {
                for (tab, label) in [
                    (SidebarTab::Add, t!("sidebar.add")),
                    (SidebarTab::Uploads, t!("sidebar.uploads")),
                    (SidebarTab::AiTools, t!("sidebar.ai")),
                    (SidebarTab::Templates, t!("sidebar.templates")),
                    (SidebarTab::Layers, t!("sidebar.layers")),
                ] {
                    if ui.selectable_label(self.sidebar_tab == tab, label).clicked() {
                        self.sidebar_tab = tab;
                    }
                }
            });
            ui.separator();
            match self.sidebar_tab {
                SidebarTab::Add => self.add_tab(ui),
                SidebarTab::Uploads => self.uploads_tab(ui),
                SidebarTab::AiTools => self.ai_tab(ui),
                SidebarTab::Templates => self.templates_tab(ui),
                SidebarTab::Layers => self.layers_panel.show(ui, &mut self.project),
            }
        });
    }

    fn add_tab(&mut self, ui: &mut egui::Ui) {
        ui.label(t!("add.text_label"));
        ui.text_edit_singleline(&mut self.text_input);
        if ui.button(t!("add.text_button")).clicked() {
            let doc = self.project.document.with_text_layer(self.text_input.trim());
            self.project.commit(doc, t!("history.add_text"));
            self.text_input.clear();
        }
        ui.add_space(8.0);

        ui.label(t!("add.shape_label"));
        ui.horizontal(|ui| {
            if ui.button(t!("add.rectangle")).clicked() {
                let doc = self.project.document.with_shape_layer();
                self.project.commit(doc, t!("history.add_shape"));
            }
            if ui.button(t!("add.circle")).clicked() {
                let (cx, cy) = self.project.document.center();
                let layer =
                    Layer::new_shape(ShapeKind::Circle, cx - 100.0, cy - 100.0, 200.0, 200.0, "#3b82f6");
                let doc = self.project.document.with_layer_appended(layer);
                self.project.commit(doc, t!("history.add_shape"));
            }
        });
        ui.add_space(8.0);

        ui.label(t!("add.emoji_label"));
        ui.horizontal_wrapped(|ui| {
            for emoji in EMOJI {
                if ui.button(emoji).clicked() {
                    let (cx, cy) = self.project.document.center();
                    let mut layer = Layer::new_text(
                        emoji,
                        cx - 60.0,
                        cy - 60.0,
                        crate::document::LayerStyle {
                            font_size: Some(120.0),
                            ..Default::default()
                        },
                    );
                    layer.name = t!("layer.emoji_name");
                    let doc = self.project.document.with_layer_appended(layer);
                    self.project.commit(doc, t!("history.add_emoji"));
                }
            }
        });
        ui.add_space(8.0);

        ui.label(t!("add.background_label"));
        if let Some(parsed) = export::parse_color(&self.project.document.background) {
            let mut rgb = [parsed[0], parsed[1], parsed[2]];
            if ui.color_edit_button_srgb(&mut rgb).changed() {
                let hex = format!("#{:02x}{:02x}{:02x}", rgb[0], rgb[1], rgb[2]);
                let doc = self.project.document.with_background(&hex);
                self.project.commit(doc, t!("history.change_background"));
            }
        } else {
            // Gradient backgrounds come from templates/AI; picking a color
            // replaces the gradient outright.
            if ui.button(t!("add.background_solid")).clicked() {
                let doc = self.project.document.with_background("#ffffff");
                self.project.commit(doc, t!("history.change_background"));
            }
        }
    }

    fn uploads_tab(&mut self, ui: &mut egui::Ui) {
        if ui
            .add_enabled(self.upload_rx.is_none(), egui::Button::new(t!("uploads.pick")))
            .clicked()
        {
            self.start_upload();
        }
        if self.upload_rx.is_some() {
            ui.spinner();
            ui.weak(t!("uploads.decoding"));
        }
    }

    fn ai_tab(&mut self, ui: &mut egui::Ui) {
        let busy = self.generation_rx.is_some();

        ui.label(t!("ai.layout_label"));
        ui.text_edit_multiline(&mut self.ai_prompt);
        if ui
            .add_enabled(
                !busy && !self.ai_prompt.trim().is_empty(),
                egui::Button::new(t!("ai.layout_button")),
            )
            .clicked()
        {
            self.ai_error = None;
            self.generation_rx = Some(ai::spawn_layout_job(
                self.service.clone(),
                self.ai_prompt.trim().to_string(),
            ));
        }
        ui.add_space(8.0);

        ui.label(t!("ai.logo_label"));
        ui.text_edit_singleline(&mut self.logo_prompt);
        if ui
            .add_enabled(
                !busy && !self.logo_prompt.trim().is_empty(),
                egui::Button::new(t!("ai.logo_button")),
            )
            .clicked()
        {
            self.ai_error = None;
            self.generation_rx = Some(ai::spawn_logo_job(
                self.service.clone(),
                self.logo_prompt.trim().to_string(),
            ));
        }

        if busy {
            ui.add_space(8.0);
            ui.spinner();
            ui.weak(t!("ai.working"));
        }
        if let Some(error) = &self.ai_error {
            ui.add_space(8.0);
            ui.colored_label(egui::Color32::from_rgb(220, 60, 60), error);
        }
    }

    fn templates_tab(&mut self, ui: &mut egui::Ui) {
        egui::ScrollArea::vertical().show(ui, |ui| {
            for template in templates::catalog() {
                let response = egui::Frame::none()
                    .inner_margin(egui::Margin::same(6.0))
                    .show(ui, |ui| {
                        ui.horizontal(|ui| {
                            let (rect, _) = ui
                                .allocate_exact_size(egui::vec2(36.0, 24.0), egui::Sense::hover());
                            let color = export::parse_color(&template.preview_color)
                                .map(|c| egui::Color32::from_rgb(c[0], c[1], c[2]))
                                .unwrap_or(egui::Color32::GRAY);
                            ui.painter().rect_filled(rect, egui::Rounding::same(4.0), color);
                            ui.vertical(|ui| {
                                ui.strong(template.name);
                                ui.weak(template.description);
                            });
                        });
                    })
                    .response;
                if response.interact(egui::Sense::click()).clicked() {
                    self.project
                        .replace_document(template.document.instantiated(), t!("history.apply_template"));
                    self.editor.request_fit();
                }
                ui.separator();
            }
        });
    }

    fn handle_editor_shortcuts(&mut self, ctx: &egui::Context) {
        if ctx.wants_keyboard_input() {
            return;
        }
        let (undo, redo) = ctx.input_mut(|i| {
            let undo = i.consume_key(egui::Modifiers::COMMAND, egui::Key::Z);
            let redo = i.consume_key(
                egui::Modifiers::COMMAND | egui::Modifiers::SHIFT,
                egui::Key::Z,
            ) || i.consume_key(egui::Modifiers::COMMAND, egui::Key::Y);
            (undo, redo)
        });
        // Shift+Z is consumed first; a plain Ctrl+Z match can't be a redo.
        if redo {
            self.project.redo();
        } else if undo {
            self.project.undo();
        }

        let delete = ctx.input(|i| {
            i.key_pressed(egui::Key::Delete) || i.key_pressed(egui::Key::Backspace)
        });
        if delete
            && let Some(id) = self.project.document.selected_layer_id.clone()
        {
            let doc = self.project.document.without_layer(&id);
            self.project.commit(doc, t!("history.delete_layer"));
        }
    }

    fn settings_window(&mut self, ctx: &egui::Context) {
        if !self.show_settings {
            return;
        }
        let mut open = true;
        let mut saved = false;
        egui::Window::new(t!("settings.title"))
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                ui.label(t!("settings.api_key"));
                ui.add(
                    egui::TextEdit::singleline(&mut self.settings_draft.api_key).password(true),
                );
                ui.label(t!("settings.model"));
                ui.text_edit_singleline(&mut self.settings_draft.model);
                ui.add_space(8.0);
                if ui.button(t!("settings.save")).clicked() {
                    saved = true;
                }
            });
        if saved {
            self.settings = self.settings_draft.clone();
            self.settings.save();
            self.service = Arc::new(GeminiClient::new(
                self.settings.api_key.clone(),
                self.settings.model.clone(),
            ));
            log_info!("settings saved (model: {})", self.settings.model);
            self.show_settings = false;
        } else if !open {
            self.show_settings = false;
        }
    }
}

/// Clickable home-screen card. Returns true when activated.
fn home_card(ui: &mut egui::Ui, title: &str, blurb: &str) -> bool {
    let response = egui::Frame::none()
        .fill(ui.visuals().faint_bg_color)
        .rounding(egui::Rounding::same(10.0))
        .inner_margin(egui::Margin::same(18.0))
        .show(ui, |ui| {
            ui.set_width(180.0);
            ui.set_height(120.0);
            ui.vertical(|ui| {
                ui.strong(title);
                ui.add_space(6.0);
                ui.label(blurb);
            });
        })
        .response;
    response.interact(egui::Sense::click()).clicked()
}

impl eframe::App for CreoApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_jobs();
        if self.jobs_pending() {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }

        match self.mode {
            AppMode::Home => self.show_home(ctx),
            AppMode::Chat => {
                egui::TopBottomPanel::top("chat_nav").show(ctx, |ui| {
                    ui.horizontal(|ui| {
                        if ui.button(t!("nav.home")).clicked() {
                            self.mode = AppMode::Home;
                        }
                        ui.heading(t!("home.chat_title"));
                    });
                });
                self.show_chat(ctx);
            }
            AppMode::Editor => self.show_editor(ctx),
        }

        self.settings_window(ctx);
    }
}
