//! Command dispatch
//!
//! Maps a prediction's top intent to a command handler when its confidence
//! clears the threshold, and falls back to the conversational completion
//! otherwise. Every dispatch appends exactly one turn to the conversation
//! history, whichever branch runs.

use crate::commands::{BotBehavior, ChatClient, Translator, WeatherClient, WebSearcher};
use crate::nlu::Prediction;
use crate::profiles::HistoryStore;
use crate::response::CommandResponse;
use crate::settings::SettingsStore;
use crate::{commands, Result, EXIT_PHRASE};

/// Minimum top-intent confidence for table dispatch
pub const CONFIDENCE_THRESHOLD: f64 = 0.70;

/// History turns seeded into the conversational fallback
pub const FALLBACK_CONTEXT_TURNS: usize = 5;

/// Fixed response for intents outside the table or missing their slot
pub const UNRECOGNIZED: &str =
    "Sorry, I don't understand that command. Please try asking again.";

/// Routes predictions to command handlers
pub struct CommandDispatcher {
    settings: SettingsStore,
    history: HistoryStore,
    behavior: BotBehavior,
    chat: Option<ChatClient>,
    translator: Option<Translator>,
    weather: Option<WeatherClient>,
    searcher: WebSearcher,
}

impl CommandDispatcher {
    /// Assemble a dispatcher over one profile's settings and history.
    /// Handlers whose client is absent answer with an apology at call time.
    #[must_use]
    pub fn new(
        settings: SettingsStore,
        history: HistoryStore,
        chat: Option<ChatClient>,
        translator: Option<Translator>,
        weather: Option<WeatherClient>,
        searcher: WebSearcher,
    ) -> Self {
        let behavior = BotBehavior::new(settings.clone());
        Self {
            settings,
            history,
            behavior,
            chat,
            translator,
            weather,
            searcher,
        }
    }

    /// Dispatch one utterance given its prediction.
    ///
    /// Appends the (utterance, response, persona) turn to history on every
    /// branch before returning.
    ///
    /// # Errors
    ///
    /// Returns an error if settings or history cannot be read or written;
    /// external-call failures never propagate past the handlers.
    pub async fn dispatch(
        &self,
        utterance: &str,
        prediction: &Prediction,
    ) -> Result<CommandResponse> {
        let response = self.route(utterance, prediction).await?;

        let persona = self.settings.persona()?;
        self.history.append(utterance, response.text(), &persona)?;

        Ok(response)
    }

    async fn route(&self, utterance: &str, prediction: &Prediction) -> Result<CommandResponse> {
        let score = prediction.top_score();
        if score < CONFIDENCE_THRESHOLD {
            tracing::debug!(
                top_intent = %prediction.top_intent,
                score,
                "below threshold, using conversational fallback"
            );
            return self.fallback(utterance).await;
        }

        tracing::debug!(intent = %prediction.top_intent, score, "dispatching intent");

        let response = match prediction.top_intent.as_str() {
            "Translate_Speech" => self.translate(prediction, false).await?,
            "One_Shot_Translation" => self.translate(prediction, true).await?,

            "Get_Weather" => match prediction.first_entity("weather_location") {
                Some(location) => match &self.weather {
                    Some(weather) => weather.get_weather(location).await,
                    None => unavailable(),
                },
                None => CommandResponse::plain(UNRECOGNIZED),
            },

            "Search_Google" => match prediction.first_entity("search_google") {
                Some(query) => self.searcher.search(query).await,
                None => CommandResponse::plain(UNRECOGNIZED),
            },
            "Open_Website" => match prediction.first_entity("open_website") {
                Some(website) => self.searcher.open_website(website),
                None => CommandResponse::plain(UNRECOGNIZED),
            },
            "Search_Youtube" => match prediction.first_entity("search_youtube") {
                Some(query) => self.searcher.search_youtube(query),
                None => CommandResponse::plain(UNRECOGNIZED),
            },

            "Change_Persona" => match prediction.first_entity("new_persona") {
                Some(name) => self.behavior.change_persona(name)?,
                None => CommandResponse::plain(UNRECOGNIZED),
            },
            "Change_Gender" => match prediction.first_entity("new_gender") {
                Some(gender) => self.behavior.change_gender(gender)?,
                None => CommandResponse::plain(UNRECOGNIZED),
            },
            "Change_Language" => match prediction.first_entity("new_language") {
                Some(language) => self.behavior.change_language(language)?,
                None => CommandResponse::plain(UNRECOGNIZED),
            },
            "Change_Voice" => match prediction.first_entity("new_voice_name") {
                Some(voice) => self.behavior.change_voice(voice)?,
                None => self.behavior.randomize_voice()?,
            },
            "Randomize_Voice" => self.behavior.randomize_voice()?,

            "Create_Image" => match prediction.first_entity("image_to_create") {
                Some(description) => match &self.chat {
                    Some(chat) => chat.create_image(description).await,
                    None => unavailable(),
                },
                None => CommandResponse::plain(UNRECOGNIZED),
            },

            "Generate_Password" => commands::password::generate_password(),

            "Set_Timer" => match prediction.first_entity("user_time") {
                Some(user_time) => self.behavior.start_timer(user_time),
                None => CommandResponse::plain(UNRECOGNIZED),
            },

            "Mute" => self.behavior.mute()?,
            "Unmute" => self.behavior.unmute()?,
            "Pause" => self.behavior.pause(),

            "Get_Conversation_History" => CommandResponse::Plain(self.history.render()?),
            "Log_Conversation" => {
                self.history.log_session()?;
                CommandResponse::plain("I've logged the conversation.")
            }
            "Clear" => {
                self.history.clear()?;
                CommandResponse::plain("Ok, I've cleared the conversation history.")
            }
            "Quit" => self.quit().await?,

            other => {
                tracing::debug!(intent = other, "intent not in dispatch table");
                CommandResponse::plain(UNRECOGNIZED)
            }
        };

        Ok(response)
    }

    async fn translate(&self, prediction: &Prediction, one_shot: bool) -> Result<CommandResponse> {
        let (Some(speech), Some(new_language)) = (
            prediction.first_entity("translate_speech"),
            prediction.first_entity("language"),
        ) else {
            return Ok(CommandResponse::plain(UNRECOGNIZED));
        };

        let Some(translator) = &self.translator else {
            return Ok(unavailable());
        };

        let current_language = self.settings.language()?;
        translator
            .translate(speech, &current_language, new_language, one_shot, &self.settings)
            .await
    }

    async fn fallback(&self, utterance: &str) -> Result<CommandResponse> {
        let Some(chat) = &self.chat else {
            return Ok(CommandResponse::plain(UNRECOGNIZED));
        };
        let prompt = self.settings.prompt()?;
        let context = self.history.recent(FALLBACK_CONTEXT_TURNS)?;
        Ok(chat.ask(utterance, &prompt, &context).await)
    }

    /// End the session: clear the conversation and say goodbye. When the
    /// profile speaks a non-English language, the goodbye is translated so
    /// the exit phrase detection happens in the translation handler.
    async fn quit(&self) -> Result<CommandResponse> {
        self.history.clear()?;

        let language = self.settings.language()?;
        if language != "english" {
            if let Some(translator) = &self.translator {
                return translator
                    .translate(EXIT_PHRASE, "english", &language, false, &self.settings)
                    .await;
            }
        }

        self.settings.mark_exit()?;
        Ok(CommandResponse::plain(EXIT_PHRASE))
    }
}

fn unavailable() -> CommandResponse {
    CommandResponse::plain("Sorry, that feature isn't available right now. Try asking again.")
}
